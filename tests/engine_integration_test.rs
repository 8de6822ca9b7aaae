// ==========================================
// Engine integration tests
// ==========================================
// Target: the chained pipeline stages between loaded records and the
// display table; no document output involved.
// ==========================================


use pricelist_gen::config::price_labels::{PriceRule, PricingRules};
use pricelist_gen::domain::catalog::{AttributeCatalog, GroupCatalog};
use pricelist_gen::domain::types::PriceOp;
use pricelist_gen::engine::aggregate::Aggregator;
use pricelist_gen::engine::filter::ProductFilter;
use pricelist_gen::engine::presenter::Presenter;
use pricelist_gen::engine::pricing::PricingEngine;
use pricelist_gen::importer::dataset_loader::DatasetLoader;
use pricelist_gen::logging;
use std::collections::HashMap;
use test_helpers::{base_config, temp_site, write_dataset, DatasetRow};

fn loader() -> DatasetLoader {
    DatasetLoader::new(GroupCatalog::builtin(), AttributeCatalog::builtin())
}

#[test]
fn test_filtered_pipeline_produces_display_rows() {
    logging::init_test();

    let (_home, paths) = temp_site();
    write_dataset(
        &paths.dataset_path,
        &[
            DatasetRow::panel("Jinko Tiger Neo 430", "Jinko"),
            DatasetRow::panel("NANOSUN Fusion 430", "NANOSUN"),
            DatasetRow::panel("Jinko Tiger Pro 450", "Jinko").set("panel_colour", "BF"),
            DatasetRow::inverter("SolaX Hybrid 10K", "SolaX"),
        ],
    )
    .expect("write dataset");
    let records = loader().load(&paths.dataset_path).expect("load dataset");

    // Panels only, Full Black only: the inverter and the Black Frame
    // panel drop out.
    let mut config = base_config(&["Panels"]);
    config.filters.colours = vec!["Full Black".to_string()];

    let filtered = ProductFilter::apply(&config, &records);
    assert_eq!(filtered.len(), 2);

    let priced = PricingEngine::price(&config, filtered);
    let rows = Aggregator::aggregate(&GroupCatalog::builtin(), priced);
    let table = Presenter::build_table(&config, &rows);

    assert_eq!(table.rows.len(), 2);
    let group = table.column_index("Group").unwrap();
    let colour = table.column_index("panel_colour").unwrap();
    let price = table.column_index("Price 1").unwrap();
    for row in &table.rows {
        assert_eq!(row[group], "Panels");
        assert_eq!(row[colour], "Full Black");
        assert_eq!(row[price], "12");
    }
}

#[test]
fn test_price_slots_and_group_rounding() {
    logging::init_test();

    let (_home, paths) = temp_site();
    write_dataset(
        &paths.dataset_path,
        &[
            DatasetRow::panel("Jinko Tiger Neo 430", "Jinko"),
            DatasetRow::inverter("SolaX Hybrid 10K", "SolaX"),
        ],
    )
    .expect("write dataset");
    let records = loader().load(&paths.dataset_path).expect("load dataset");

    let mut config = base_config(&["Panels", "Inverters"]);
    config.num_prices = 2;
    config.rules = PricingRules::new(HashMap::from([(
        "Panels".to_string(),
        vec![
            PriceRule {
                operation: PriceOp::Multiply,
                coefficient: 1.0715,
                header: "MOC EUR".to_string(),
            },
            PriceRule {
                operation: PriceOp::Add,
                coefficient: 2.5,
                header: "VOC EUR".to_string(),
            },
        ],
    )]));

    let filtered = ProductFilter::apply(&config, &records);
    let priced = PricingEngine::price(&config, filtered);

    // Panels price in fractional units; the unconfigured inverter group
    // falls back to multiply-by-1.2 and rounds to whole units.
    let panel = priced
        .iter()
        .find(|p| p.record.group == "Panels")
        .expect("panel row");
    assert_eq!(panel.slot_prices, vec![10.715, 12.5]);
    let inverter = priced
        .iter()
        .find(|p| p.record.group == "Inverters")
        .expect("inverter row");
    assert_eq!(inverter.slot_prices, vec![1344.0, 1344.0]);

    // Slot headers come from the first selected group's labels.
    let rows = Aggregator::aggregate(&GroupCatalog::builtin(), priced);
    let table = Presenter::build_table(&config, &rows);
    let headers = table.headers();
    assert!(headers.contains(&"MOC EUR".to_string()));
    assert!(headers.contains(&"VOC EUR".to_string()));

    let price2 = table.column_index("Price 2").unwrap();
    assert_eq!(table.rows[0][price2], "12.500");
    assert_eq!(table.rows[1][price2], "1 344");
}

#[test]
fn test_delivery_window_and_no_date_precedence() {
    logging::init_test();

    let (_home, paths) = temp_site();
    write_dataset(
        &paths.dataset_path,
        &[
            DatasetRow::panel("Stock Panel", "Jinko")
                .set("delivery_month", "")
                .set("delivery_cw", ""),
            DatasetRow::panel("March Panel", "Jinko").set("delivery_month", "2026-03"),
            DatasetRow::panel("September Panel", "Jinko"),
        ],
    )
    .expect("write dataset");
    let records = loader().load(&paths.dataset_path).expect("load dataset");

    // A month window keeps only rows inside it; undated rows drop out.
    let mut config = base_config(&["Panels"]);
    config.filters.delivery_month_from = Some("2026-04".to_string());
    let kept = ProductFilter::apply(&config, &records);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].product_name, "September Panel");

    // The no-date toggle overrides the window entirely.
    config.filters.no_delivery_date = true;
    let kept = ProductFilter::apply(&config, &records);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].product_name, "Stock Panel");
}

#[test]
fn test_display_formatting_flows_to_table() {
    logging::init_test();

    let (_home, paths) = temp_site();
    write_dataset(
        &paths.dataset_path,
        &[DatasetRow::panel("Jinko Tiger Neo 430", "Jinko")
            .set("available_cz", "1250.5")
            .set("delivery_cw", "0")],
    )
    .expect("write dataset");
    let records = loader().load(&paths.dataset_path).expect("load dataset");

    let config = base_config(&["Panels"]);
    let priced = PricingEngine::price(&config, ProductFilter::apply(&config, &records));
    let rows = Aggregator::aggregate(&GroupCatalog::builtin(), priced);
    let table = Presenter::build_table(&config, &rows);

    let row = &table.rows[0];
    let idx = |key: &str| table.column_index(key).unwrap();
    // Space-grouped thousands with 3 decimals for fractional values.
    assert_eq!(row[idx("available")], "1 250.500");
    // Sentinel "0" renders blank, as does the zero carton count.
    assert_eq!(row[idx("delivery_cw")], "");
    assert_eq!(row[idx("pcs_ctn")], "");
    assert_eq!(row[idx("length")], "1 722");
    assert_eq!(row[idx("Price 1")], "12");
}
