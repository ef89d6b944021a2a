//! Shared HTML building blocks and formatting helpers for maud views.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};

use numfmt::{Formatter, Precision};

// Class names referenced by the stylesheet in [base].
pub const FORM_LABEL_STYLE: &str = "form-label";
pub const FORM_TEXT_INPUT_STYLE: &str = "form-input";
pub const BUTTON_PRIMARY_STYLE: &str = "button-primary";
pub const BUTTON_DANGER_STYLE: &str = "button-danger";
pub const CARD_STYLE: &str = "card";
pub const TABLE_HEADER_STYLE: &str = "table-header";
pub const TABLE_ROW_STYLE: &str = "table-row";
pub const TABLE_CELL_STYLE: &str = "table-cell";

const STYLESHEET: &str = r#"
    body { margin: 0; font-family: system-ui, sans-serif; background: #f9fafb; color: #111827; }
    main { max-width: 64rem; margin: 0 auto; padding: 1.5rem; }
    h1 { font-size: 1.5rem; }
    h2 { font-size: 1.125rem; }
    a { color: #2563eb; }
    .card { background: #ffffff; border: 1px solid #e5e7eb; border-radius: 0.5rem;
            padding: 1rem 1.25rem; margin-bottom: 1rem; }
    .summary-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
    .summary-figure { font-size: 1.25rem; font-weight: 600; }
    .summary-negative { color: #dc2626; }
    .form-row { display: flex; flex-wrap: wrap; gap: 1rem; margin-bottom: 0.75rem; }
    .form-label { display: block; margin-bottom: 0.25rem; font-size: 0.875rem; font-weight: 500; }
    .form-input { display: block; padding: 0.5rem; border: 1px solid #d1d5db;
                  border-radius: 0.25rem; font-size: 0.875rem; }
    .button-primary { padding: 0.5rem 1rem; background: #2563eb; color: #ffffff;
                      border: none; border-radius: 0.25rem; cursor: pointer; }
    .button-primary:hover { background: #1d4ed8; }
    .button-danger { padding: 0.5rem 1rem; background: #dc2626; color: #ffffff;
                     border: none; border-radius: 0.25rem; cursor: pointer; }
    .button-danger:hover { background: #b91c1c; }
    table { width: 100%; border-collapse: collapse; }
    .table-header { text-align: left; font-size: 0.75rem; text-transform: uppercase;
                    color: #374151; background: #f3f4f6; }
    .table-row { background: #ffffff; border-bottom: 1px solid #e5e7eb; }
    .table-cell { padding: 0.75rem 1rem; }
"#;

/// Wrap `content` in the shared page skeleton: doctype, head, stylesheet.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Expenseur" }

                style { (PreEscaped(STYLESHEET)) }
            }

            body
            {
                main
                {
                    (content)
                }
            }
        }
    }
}

/// Format `number` as a currency amount, e.g. `-1234.5` becomes `-$1,234.50`.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}
