//! Property-based tests for the amount derivation and availability rules.
//!
//! These use proptest to verify the editor's invariants across a wide
//! range of inputs, catching edge cases unit tests miss.

use proptest::prelude::*;
use rust_decimal::Decimal;

use mfgops_console::editor::amounts::{line_amount, parse_decimal_or_zero};
use mfgops_console::editor::{ComponentEdit, DocumentEditor};
use mfgops_console::models::bom::BomRow;
use mfgops_console::models::catalog::Product;
use mfgops_console::models::document::DocumentKind;

fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000, 0u32..4).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

proptest! {
    #[test]
    fn amount_is_always_the_product_of_its_factors(
        quantity in decimal_strategy(),
        rate in decimal_strategy(),
    ) {
        prop_assert_eq!(line_amount(quantity, rate), quantity * rate);
    }

    #[test]
    fn negative_factors_always_zero_the_amount(
        quantity in decimal_strategy(),
        rate in decimal_strategy(),
    ) {
        prop_assert_eq!(line_amount(-quantity - Decimal::ONE, rate), Decimal::ZERO);
        prop_assert_eq!(line_amount(quantity, -rate - Decimal::ONE), Decimal::ZERO);
    }

    #[test]
    fn garbage_input_never_panics_and_coerces_to_zero(raw in "[a-z!@# ]{0,12}") {
        let parsed = parse_decimal_or_zero(&raw);
        prop_assert_eq!(parsed, Decimal::ZERO);
    }

    #[test]
    fn numeric_input_round_trips_through_coercion(value in decimal_strategy()) {
        prop_assert_eq!(parse_decimal_or_zero(&value.to_string()), value);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn quantity_cascade_reaches_every_component(
        quantity in 1i64..10_000,
        rates in prop::collection::vec(decimal_strategy(), 1..6),
    ) {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        let product = Product { id: 1, name: "P".into(), rate: Decimal::ONE };
        let ticket = editor.select_product(0, &product).unwrap();
        let rows: Vec<BomRow> = rates
            .iter()
            .map(|rate| BomRow {
                component_id: Some(7),
                quantity: Decimal::ONE,
                unit: Some("pcs".into()),
                rate: *rate,
            })
            .collect();
        editor.apply_bom_rows(&ticket, &rows);

        editor.set_product_quantity(0, &quantity.to_string()).unwrap();

        let qty = Decimal::from(quantity);
        let line = &editor.document().products[0];
        for component in &line.components {
            prop_assert_eq!(component.quantity, qty);
            prop_assert_eq!(component.amount, qty * component.rate);
        }
    }

    #[test]
    fn component_edit_keeps_product_amount_equal_to_component_sum(
        quantity_raw in 0i64..1_000,
        rate_raw in 0i64..1_000,
    ) {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        editor
            .update_component_field(0, 0, ComponentEdit::Quantity(quantity_raw.to_string()))
            .unwrap();
        editor
            .update_component_field(0, 0, ComponentEdit::Rate(rate_raw.to_string()))
            .unwrap();

        let doc = editor.document();
        prop_assert_eq!(doc.products[0].amount, doc.products[0].component_total());
    }

    #[test]
    fn availability_never_hides_the_current_assignment(
        ids in prop::collection::vec(1i64..50, 1..8),
        current in 0usize..8,
    ) {
        let current = current % ids.len();
        let catalog: Vec<Product> = ids
            .iter()
            .map(|id| Product { id: *id, name: format!("P{}", id), rate: Decimal::ZERO })
            .collect();
        let assigned: Vec<Option<i64>> = ids.iter().map(|id| Some(*id)).collect();

        let visible = mfgops_console::editor::availability::available(
            &catalog,
            &assigned,
            Some(current),
        );
        prop_assert!(visible.iter().any(|p| p.id == ids[current]));
    }
}
