// ==========================================
// Price list generator - pricing rules and label defaults
// ==========================================
// Explicit mapping from (group, slot index) -> {operation, coefficient,
// header}, bounded by MAX_PRICE_SLOTS. Unconfigured groups resolve through
// the defaults registry, never to an error.
// ==========================================

use crate::domain::types::{PriceOp, MAX_PRICE_SLOTS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Fallback rule applied when a group has no configured entry for a slot.
pub const FALLBACK_OPERATION: PriceOp = PriceOp::Multiply;
pub const FALLBACK_COEFFICIENT: f64 = 1.2;

/// Registry key of the generic fallback group.
pub const OTHER_GROUP: &str = "Other";

/// Group whose unit prices are small enough to price in fractional
/// currency; rounded to 3 decimals where every other group rounds to
/// whole units.
pub const PANELS_GROUP: &str = "Panels";

// ==========================================
// PriceRule - one configured price slot
// ==========================================

/// Operation, coefficient, and display header for one price slot of one
/// product group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRule {
    pub operation: PriceOp,
    pub coefficient: f64,
    #[serde(default)]
    pub header: String,
}

impl Default for PriceRule {
    fn default() -> Self {
        Self {
            operation: FALLBACK_OPERATION,
            coefficient: FALLBACK_COEFFICIENT,
            header: String::new(),
        }
    }
}

// ==========================================
// GroupRuleDefaults - registry entry for one group
// ==========================================

/// Per-group default operation, coefficient, and the four slot labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRuleDefaults {
    pub operation: PriceOp,
    pub coefficient: f64,
    pub labels: [String; MAX_PRICE_SLOTS],
}

impl GroupRuleDefaults {
    fn generic() -> Self {
        Self {
            operation: FALLBACK_OPERATION,
            coefficient: FALLBACK_COEFFICIENT,
            labels: [
                "Price 1".to_string(),
                "Price 2".to_string(),
                "Price 3".to_string(),
                "Price 4".to_string(),
            ],
        }
    }
}

// ==========================================
// DefaultRuleRegistry - per-group defaults with "Other" fallback
// ==========================================

/// Registry of per-group rule defaults. Lookup falls back to the "Other"
/// entry for groups without their own entry, then to a positional
/// placeholder label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultRuleRegistry {
    groups: HashMap<String, GroupRuleDefaults>,
}

impl Default for DefaultRuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DefaultRuleRegistry {
    /// Built-in registry: a "Panels" entry and the mandatory "Other" entry.
    pub fn builtin() -> Self {
        let mut groups = HashMap::new();
        groups.insert("Panels".to_string(), GroupRuleDefaults::generic());
        groups.insert(OTHER_GROUP.to_string(), GroupRuleDefaults::generic());
        Self { groups }
    }

    /// Loads registry overrides from a JSON file keyed by group name.
    pub fn from_json_file(path: &Path) -> Result<Self, std::io::Error> {
        let raw = std::fs::read_to_string(path)?;
        let groups: HashMap<String, GroupRuleDefaults> = serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Self { groups })
    }

    /// Default label for a slot: group entry, then "Other", then the
    /// positional placeholder.
    pub fn label(&self, group: &str, slot: usize) -> String {
        debug_assert!(slot >= 1 && slot <= MAX_PRICE_SLOTS);
        self.groups
            .get(group)
            .or_else(|| self.groups.get(OTHER_GROUP))
            .and_then(|entry| entry.labels.get(slot - 1))
            .cloned()
            .unwrap_or_else(|| format!("Price {}", slot))
    }

    /// Default (operation, coefficient) for a group: group entry, then
    /// "Other", then the fixed fallback rule.
    pub fn rule(&self, group: &str) -> (PriceOp, f64) {
        self.groups
            .get(group)
            .or_else(|| self.groups.get(OTHER_GROUP))
            .map(|entry| (entry.operation, entry.coefficient))
            .unwrap_or((FALLBACK_OPERATION, FALLBACK_COEFFICIENT))
    }
}

// ==========================================
// PricingRules - configured rules for one generation run
// ==========================================

/// The per-group, per-slot rules of one configuration, resolved against
/// the defaults registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingRules {
    /// Configured rules keyed by display group; index 0 is slot 1.
    #[serde(default)]
    pub groups: HashMap<String, Vec<PriceRule>>,

    /// Defaults registry backing the fallback chain.
    #[serde(skip, default)]
    registry: Option<DefaultRuleRegistry>,
}

impl PricingRules {
    pub fn new(groups: HashMap<String, Vec<PriceRule>>) -> Self {
        Self {
            groups,
            registry: None,
        }
    }

    /// Attaches the defaults registry used for label and rule fallback.
    pub fn with_registry(mut self, registry: DefaultRuleRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Rejects rule sets exceeding the slot bound.
    pub fn validate(&self) -> Result<(), String> {
        for (group, rules) in &self.groups {
            if rules.len() > MAX_PRICE_SLOTS {
                return Err(format!(
                    "group {} configures {} price slots, the maximum is {}",
                    group,
                    rules.len(),
                    MAX_PRICE_SLOTS
                ));
            }
        }
        Ok(())
    }

    /// The (operation, coefficient) to apply for a group and 1-based slot.
    ///
    /// Groups without a configured rule fall back to the registry default
    /// and finally to the fixed fallback rule (multiply by 1.2).
    pub fn rule_for(&self, group: &str, slot: usize) -> (PriceOp, f64) {
        if let Some(rule) = self.groups.get(group).and_then(|r| r.get(slot - 1)) {
            return (rule.operation, rule.coefficient);
        }
        match &self.registry {
            Some(registry) => registry.rule(group),
            None => (FALLBACK_OPERATION, FALLBACK_COEFFICIENT),
        }
    }

    /// Display header for a group's 1-based price slot.
    ///
    /// Chain: configured header, registry group label, registry "Other"
    /// label, positional placeholder.
    pub fn label_for(&self, group: &str, slot: usize) -> String {
        if let Some(rule) = self.groups.get(group).and_then(|r| r.get(slot - 1)) {
            if !rule.header.trim().is_empty() {
                return rule.header.clone();
            }
        }
        match &self.registry {
            Some(registry) => registry.label(group, slot),
            None => format!("Price {}", slot),
        }
    }
}
