// ==========================================
// Price list generator - configuration layer
// ==========================================
// Saved generation configurations, per-group pricing rules, and the
// on-disk layout of a single installation.
// ==========================================

pub mod price_labels;
pub mod settings;

pub use price_labels::{
    DefaultRuleRegistry, PriceRule, PricingRules, FALLBACK_COEFFICIENT, FALLBACK_OPERATION,
    OTHER_GROUP, PANELS_GROUP,
};
pub use settings::{FilterSpec, GenerationConfig, SitePaths, HOME_ENV_VAR};
