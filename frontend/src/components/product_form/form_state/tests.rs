use super::*;
use uuid::Uuid;

type Form = ProductForm<String>;

fn product(code: &str, variants: Vec<VariantDefinition>) -> Product {
    Product {
        id: Uuid::from_u128(7),
        number: Some(7),
        code: code.to_string(),
        name: "T-Shirt".to_string(),
        image: Some("http://localhost:8000/media/uploads/shirt.png".to_string()),
        tax_code: None,
        is_favourite: true,
        active: false,
        total_stock: None,
        created_at: None,
        updated_at: None,
        variants,
        product_variants: Vec::new(),
    }
}

fn filled() -> Form {
    let mut form = Form::create();
    form.set_name("T-Shirt".to_string());
    form.set_code("TS".to_string());
    form.set_variant_name(0, "Color".to_string());
    form.set_option_value(0, 0, "red".to_string());
    form
}

#[test]
fn create_starts_with_one_variant_and_one_option() {
    let form = Form::create();
    assert!(form.active);
    assert_eq!(form.variants.len(), 1);
    assert_eq!(form.variants[0].options.len(), 1);
    assert_eq!(form.product_id(), None);
}

#[test]
fn edit_seeds_a_variant_when_the_product_has_none() {
    let form = Form::edit(&product("TS", Vec::new()));
    assert_eq!(form.variants.len(), 1);
    assert_eq!(form.variants[0].options.len(), 1);
    assert!(!form.active);
    assert!(form.is_favourite);
    assert_eq!(form.image.file_name(), Some("shirt.png"));
}

#[test]
fn edit_seeds_an_option_for_variants_without_options() {
    let form = Form::edit(&product(
        "TS",
        vec![VariantDefinition {
            id: None,
            name: "Size".to_string(),
            options: Vec::new(),
        }],
    ));
    assert_eq!(form.variants[0].name.value, "Size");
    assert_eq!(form.variants[0].options.len(), 1);
}

#[test]
fn errors_are_hidden_until_touched() {
    let mut form = Form::create();
    assert_eq!(form.errors().name, Some(NAME_REQUIRED));
    assert_eq!(form.name_error(), None);

    form.blur_name();
    assert_eq!(form.name_error(), Some(NAME_REQUIRED));
}

#[test]
fn empty_submission_shows_both_required_errors() {
    let mut form = Form::create();
    assert!(form.prepare_submission().is_none());
    assert_eq!(form.name_error(), Some(NAME_REQUIRED));
    assert_eq!(form.code_error(), Some(CODE_REQUIRED));
    assert_eq!(form.variant_name_error(0), Some(VARIANT_NAME_REQUIRED));
    assert_eq!(form.option_error(0, 0), Some(OPTION_VALUE_REQUIRED));
}

#[test]
fn whitespace_counts_as_empty() {
    let mut form = filled();
    form.set_name("   ".to_string());
    assert!(form.prepare_submission().is_none());
    assert_eq!(form.name_error(), Some(NAME_REQUIRED));
}

#[test]
fn add_variant_appends_one_blank_option() {
    let mut form = filled();
    form.add_variant();
    assert_eq!(form.variants.len(), 2);
    assert_eq!(form.variants[1].options, vec![TextField::default()]);
}

#[test]
fn removing_the_last_option_is_not_reseeded() {
    let mut form = filled();
    form.remove_option(0, 0);
    assert!(form.variants[0].options.is_empty());
    assert_eq!(form.missing_options_error(0), Some(OPTIONS_REQUIRED));
    assert!(form.prepare_submission().is_none());
}

#[test]
fn out_of_range_indices_are_ignored() {
    let mut form = filled();
    form.remove_variant(5);
    form.remove_option(0, 9);
    form.set_option_value(3, 0, "x".to_string());
    assert_eq!(form, filled());
}

#[test]
fn valid_form_produces_trimmed_submission() {
    let mut form = filled();
    form.add_option(0);
    form.set_option_value(0, 1, " blue ".to_string());
    form.set_tax_code(" 6109 ".to_string());

    let submission = form.prepare_submission().unwrap();
    assert_eq!(submission.name, "T-Shirt");
    assert_eq!(submission.tax_code, "6109");
    assert!(submission.active);
    assert_eq!(submission.variants[0].name, "Color");
    assert_eq!(
        submission.variants[0].options,
        vec![OptionValue::new("red"), OptionValue::new("blue")]
    );
    assert_eq!(submission.image, None);
}

#[test]
fn existing_image_is_not_resent_on_edit() {
    let mut form = Form::edit(&product(
        "TS",
        vec![VariantDefinition {
            id: None,
            name: "Color".to_string(),
            options: vec![OptionValue::new("red")],
        }],
    ));
    let submission = form.prepare_submission().unwrap();
    assert_eq!(submission.image, None);

    form.select_image("new.png".to_string(), "file-handle".to_string());
    let submission = form.prepare_submission().unwrap();
    assert_eq!(submission.image.as_deref(), Some("file-handle"));
}

#[test]
fn code_change_issues_ticket_and_taken_blocks_submit() {
    let mut form = filled();
    let ticket = form.set_code("TS-2".to_string()).unwrap();
    assert_eq!(ticket.code, "TS-2");
    assert_eq!(form.code_check(), CodeAvailability::Checking);

    assert!(form.apply_code_check(&ticket, CodeCheckOutcome::Taken));
    assert_eq!(form.code_error(), Some(CODE_TAKEN));
    assert!(form.prepare_submission().is_none());
}

#[test]
fn stale_code_check_is_dropped() {
    let mut form = filled();
    let first = form.set_code("A".to_string()).unwrap();
    let second = form.set_code("AB".to_string()).unwrap();

    assert!(form.apply_code_check(&second, CodeCheckOutcome::Available));
    assert!(!form.apply_code_check(&first, CodeCheckOutcome::Taken));
    assert_eq!(form.code_check(), CodeAvailability::Available);
    assert_eq!(form.code_error(), None);
}

#[test]
fn failed_code_check_warns_without_blocking() {
    let mut form = filled();
    let ticket = form.set_code("TS-3".to_string()).unwrap();
    form.apply_code_check(&ticket, CodeCheckOutcome::Failed);
    assert_eq!(form.code_error(), Some(CODE_CHECK_FAILED));
    assert!(form.prepare_submission().is_some());
}

#[test]
fn unchanged_code_on_edit_skips_the_round_trip() {
    let mut form = Form::edit(&product("TS", Vec::new()));
    assert!(form.set_code("TSX".to_string()).is_some());
    assert!(form.set_code("TS".to_string()).is_none());
    assert_eq!(form.code_check(), CodeAvailability::Available);
}

#[test]
fn blank_code_is_not_checked() {
    let mut form = filled();
    assert!(form.set_code("  ".to_string()).is_none());
    assert_eq!(form.code_check(), CodeAvailability::Unchecked);
}
