// ==========================================
// Price list generator - aggregator
// ==========================================
// Responsibility: collapse priced records into one row per
// (group, brand, product name) and order rows canonically.
// Red line: stateless, no side effects, no I/O.
// ==========================================

use crate::domain::catalog::GroupCatalog;
use crate::domain::record::{AggregatedRow, PricedRecord};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// Aggregator - product variant reduction
// ==========================================
pub struct Aggregator;

impl Aggregator {
    /// Collapses records sharing (group, brand, product name) into one
    /// row.
    ///
    /// # Rules
    /// - availability: sum
    /// - base price and every slot price: max, so duplicate rows with a
    ///   stale lower price cannot pull the output down
    /// - descriptive columns: first-encountered value in input order
    /// - rows whose summed availability is not positive are dropped
    /// - output order: canonical group sequence, then brand, then
    ///   product name; unknown groups sort last
    pub fn aggregate(catalog: &GroupCatalog, priced: Vec<PricedRecord>) -> Vec<AggregatedRow> {
        let before = priced.len();
        let mut by_key: HashMap<(String, String, String), AggregatedRow> = HashMap::new();

        for p in priced {
            let key = (
                p.record.group.clone(),
                p.record.brand.clone(),
                p.record.product_name.clone(),
            );
            match by_key.entry(key) {
                Entry::Occupied(mut entry) => {
                    let row = entry.get_mut();
                    row.available += p.effective_available;
                    row.base_price = row.base_price.max(p.base_price);
                    for (slot, price) in row.slot_prices.iter_mut().zip(p.slot_prices.iter()) {
                        *slot = slot.max(*price);
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(AggregatedRow {
                        group: p.record.group,
                        brand: p.record.brand,
                        product_name: p.record.product_name,
                        available: p.effective_available,
                        base_price: p.base_price,
                        slot_prices: p.slot_prices,
                        delivery_month: p.record.delivery_month,
                        delivery_cw: p.record.delivery_cw,
                        panel_power: p.record.panel_power,
                        panel_colour: p.record.panel_colour,
                        panel_design: p.record.panel_design,
                        length: p.record.length,
                        width: p.record.width,
                        height: p.record.height,
                        pcs_pal: p.record.pcs_pal,
                        pcs_ctn: p.record.pcs_ctn,
                    });
                }
            }
        }

        let mut rows: Vec<AggregatedRow> = by_key
            .into_values()
            .filter(|row| row.available > 0.0)
            .collect();
        rows.sort_by(|a, b| {
            (catalog.rank(&a.group), &a.brand, &a.product_name).cmp(&(
                catalog.rank(&b.group),
                &b.brand,
                &b.product_name,
            ))
        });

        debug!(before, after = rows.len(), "aggregation applied");
        rows
    }
}
