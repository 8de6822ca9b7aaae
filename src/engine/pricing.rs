// ==========================================
// Price list generator - pricing engine
// ==========================================
// Responsibility: warehouse base-price selection, availability
// accounting, and per-slot price computation.
// Red line: stateless, no side effects, no I/O.
// ==========================================

use crate::config::price_labels::PANELS_GROUP;
use crate::config::settings::GenerationConfig;
use crate::domain::record::{PricedRecord, ProductRecord};
use crate::domain::types::Warehouse;
use tracing::debug;

// ==========================================
// PricingEngine - rule evaluation per record
// ==========================================
pub struct PricingEngine;

impl PricingEngine {
    /// Prices every record and applies the warehouse availability
    /// accounting. Records whose effective availability is not positive
    /// are dropped here, before aggregation.
    ///
    /// # Rules
    /// - base price: bp_eur_cz at the stock warehouse, bp_eur elsewhere
    /// - effective availability: the reserved quantity at the stock
    ///   warehouse, total minus reserved at Rotterdam
    /// - slot price: the group's (operation, coefficient) applied to the
    ///   base price, resolved through the rule fallback chain
    /// - rounding: 3 decimals for Panels, whole units for every other
    ///   group
    pub fn price(config: &GenerationConfig, records: Vec<ProductRecord>) -> Vec<PricedRecord> {
        let before = records.len();
        let priced: Vec<PricedRecord> = records
            .into_iter()
            .filter_map(|record| Self::price_record(config, record))
            .collect();
        debug!(before, after = priced.len(), "pricing applied");
        priced
    }

    fn price_record(config: &GenerationConfig, record: ProductRecord) -> Option<PricedRecord> {
        let base_price = match config.warehouse {
            Warehouse::Decin => record.bp_eur_cz,
            Warehouse::Rotterdam => record.bp_eur,
        };
        let effective_available = match config.warehouse {
            Warehouse::Decin => record.available_cz,
            Warehouse::Rotterdam => record.available - record.available_cz,
        };
        if effective_available <= 0.0 {
            return None;
        }

        let slot_prices = (1..=config.num_prices)
            .map(|slot| {
                let (operation, coefficient) = config.rules.rule_for(&record.group, slot);
                round_price(&record.group, operation.apply(base_price, coefficient))
            })
            .collect();

        Some(PricedRecord {
            record,
            base_price,
            effective_available,
            slot_prices,
        })
    }
}

/// Panels price in fractional currency units, everything else in whole
/// units.
pub fn round_price(group: &str, value: f64) -> f64 {
    if group == PANELS_GROUP {
        (value * 1000.0).round() / 1000.0
    } else {
        value.round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::price_labels::{PriceRule, PricingRules};
    use crate::config::settings::FilterSpec;
    use crate::domain::types::PriceOp;
    use std::collections::HashMap;

    fn record(group: &str, available: f64, available_cz: f64) -> ProductRecord {
        ProductRecord {
            product_name: "p".to_string(),
            status: String::new(),
            bp_eur: 100.0,
            bp_eur_cz: 10.0,
            delivery_month: String::new(),
            available,
            available_cz,
            released_rtd: 0.0,
            brand: "b".to_string(),
            panel_colour: String::new(),
            panel_design: String::new(),
            panel_power: 0.0,
            inverter_power: 0.0,
            nomenclature_group: String::new(),
            group: group.to_string(),
            delivery_cw: String::new(),
            length: 0.0,
            height: 0.0,
            width: 0.0,
            pcs_ctn: 0.0,
            pcs_pal: 0.0,
        }
    }

    fn config(warehouse: Warehouse, num_prices: usize, rules: PricingRules) -> GenerationConfig {
        GenerationConfig {
            name: "t".to_string(),
            user: "u".to_string(),
            selected_groups: vec!["Panels".to_string()],
            selected_brands: vec![],
            select_all_brands: true,
            warehouse,
            num_prices,
            rules,
            selected_columns: vec![],
            filters: FilterSpec::default(),
        }
    }

    fn multiply_rules(group: &str, coefficient: f64) -> PricingRules {
        let mut groups = HashMap::new();
        groups.insert(
            group.to_string(),
            vec![PriceRule {
                operation: PriceOp::Multiply,
                coefficient,
                header: String::new(),
            }],
        );
        PricingRules::new(groups)
    }

    #[test]
    fn test_stock_warehouse_uses_reserved_quantity() {
        let config = config(Warehouse::Decin, 1, multiply_rules("Panels", 1.2));
        let priced = PricingEngine::price(&config, vec![record("Panels", 20.0, 5.0)]);
        assert_eq!(priced.len(), 1);
        assert_eq!(priced[0].base_price, 10.0);
        assert_eq!(priced[0].effective_available, 5.0);
        assert_eq!(priced[0].slot_prices, vec![12.0]);
    }

    #[test]
    fn test_rotterdam_subtracts_reserved_quantity() {
        let config = config(Warehouse::Rotterdam, 1, multiply_rules("Panels", 1.2));
        let priced = PricingEngine::price(&config, vec![record("Panels", 20.0, 5.0)]);
        assert_eq!(priced.len(), 1);
        assert_eq!(priced[0].base_price, 100.0);
        assert_eq!(priced[0].effective_available, 15.0);
    }

    #[test]
    fn test_fully_reserved_stock_is_dropped() {
        let config = config(Warehouse::Rotterdam, 1, PricingRules::default());
        let priced = PricingEngine::price(&config, vec![record("Panels", 5.0, 5.0)]);
        assert!(priced.is_empty());
    }

    #[test]
    fn test_add_operation_and_whole_unit_rounding() {
        let mut groups = HashMap::new();
        groups.insert(
            "Inverters".to_string(),
            vec![PriceRule {
                operation: PriceOp::Add,
                coefficient: 15.4,
                header: String::new(),
            }],
        );
        let config = config(Warehouse::Decin, 1, PricingRules::new(groups));
        let priced = PricingEngine::price(&config, vec![record("Inverters", 0.0, 3.0)]);
        // 10 + 15.4 = 25.4, rounded to whole units outside Panels
        assert_eq!(priced[0].slot_prices, vec![25.0]);
    }

    #[test]
    fn test_panels_round_to_three_decimals() {
        let config = config(Warehouse::Decin, 1, multiply_rules("Panels", 1.0715));
        let priced = PricingEngine::price(&config, vec![record("Panels", 0.0, 1.0)]);
        assert_eq!(priced[0].slot_prices, vec![10.715]);
    }

    #[test]
    fn test_unconfigured_group_uses_fallback_rule() {
        // No rules at all: multiply by 1.2
        let config = config(Warehouse::Decin, 2, PricingRules::default());
        let priced = PricingEngine::price(&config, vec![record("Batteries", 0.0, 1.0)]);
        assert_eq!(priced[0].slot_prices, vec![12.0, 12.0]);
    }

    #[test]
    fn test_zero_slots_yield_no_prices() {
        let config = config(Warehouse::Decin, 0, PricingRules::default());
        let priced = PricingEngine::price(&config, vec![record("Panels", 0.0, 1.0)]);
        assert!(priced[0].slot_prices.is_empty());
    }
}
