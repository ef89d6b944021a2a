//! Renders the current month's expenses as an A4 PDF document.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rect, Rgb, path::PaintMode,
};

use crate::{Error, expense::Expense, html::format_currency};

use super::Aggregate;

/// The fixed name the report is written to and served as.
///
/// Every export overwrites the previous file.
pub const REPORT_FILE_NAME: &str = "Monthly_Expense_Report.pdf";

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 15.0;
const ROW_HEIGHT_MM: f64 = 8.0;
const TITLE_FONT_SIZE: f64 = 18.0;
const BODY_FONT_SIZE: f64 = 10.0;

const TABLE_HEADERS: [&str; 5] = ["Amount", "Description", "Date", "Payment Mode", "Category"];
const COLUMN_WIDTHS_MM: [f64; 5] = [24.0, 62.0, 26.0, 32.0, 36.0];

/// Render the report for one month: a title, the three aggregate figures,
/// and a gridlined table with one row per expense.
///
/// Rows that do not fit on the first page continue on extra pages, each with
/// its own header row.
///
/// # Errors
/// Returns [Error::PdfRender] if the document cannot be built.
pub fn render_pdf(aggregate: &Aggregate, expenses: &[Expense]) -> Result<Vec<u8>, Error> {
    let (document, page, layer) = PdfDocument::new(
        "Expense Monthly Report",
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "report",
    );

    let regular = add_font(&document, BuiltinFont::Helvetica)?;
    let bold = add_font(&document, BuiltinFont::HelveticaBold)?;

    let layer = document.get_page(page).get_layer(layer);
    layer.set_outline_color(black());
    layer.set_outline_thickness(0.6);

    layer.set_fill_color(black());
    layer.use_text(
        "Expense Monthly Report",
        TITLE_FONT_SIZE as f32,
        Mm(MARGIN_MM as f32),
        Mm((PAGE_HEIGHT_MM - 20.0) as f32),
        &bold,
    );

    let figures = [
        format!("Total Spent: {}", format_currency(aggregate.total_spent)),
        format!("Budget: {}", format_currency(aggregate.budget_amount)),
        format!("Remaining: {}", format_currency(aggregate.remaining)),
    ];

    let mut cursor_y = PAGE_HEIGHT_MM - 30.0;

    for figure in figures {
        layer.use_text(figure, 11.0, Mm(MARGIN_MM as f32), Mm(cursor_y as f32), &regular);
        cursor_y -= 7.0;
    }

    cursor_y -= 4.0;

    let mut layer = layer;
    draw_header_row(&layer, &bold, cursor_y);
    cursor_y -= ROW_HEIGHT_MM;

    for expense in expenses {
        if cursor_y - ROW_HEIGHT_MM < MARGIN_MM {
            let (next_page, next_layer) =
                document.add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "report");
            layer = document.get_page(next_page).get_layer(next_layer);
            layer.set_outline_color(black());
            layer.set_outline_thickness(0.6);

            cursor_y = PAGE_HEIGHT_MM - MARGIN_MM;
            draw_header_row(&layer, &bold, cursor_y);
            cursor_y -= ROW_HEIGHT_MM;
        }

        let cells = [
            format_currency(expense.amount),
            expense.description.clone(),
            expense.date.to_string(),
            expense.payment_mode.clone(),
            expense.category.clone(),
        ];

        layer.set_fill_color(black());
        draw_row(&layer, &regular, &cells, cursor_y);
        cursor_y -= ROW_HEIGHT_MM;
    }

    document
        .save_to_bytes()
        .map_err(|error| Error::PdfRender(error.to_string()))
}

fn add_font(
    document: &PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, Error> {
    document
        .add_builtin_font(font)
        .map_err(|error| Error::PdfRender(error.to_string()))
}

/// Draw the header row: a grey background with near-white text, so the
/// header stands out from the gridlined body rows.
fn draw_header_row(layer: &PdfLayerReference, font: &IndirectFontRef, y_top: f64) {
    layer.set_fill_color(grey());
    layer.add_rect(
        Rect::new(
            Mm(MARGIN_MM as f32),
            Mm((y_top - ROW_HEIGHT_MM) as f32),
            Mm((MARGIN_MM + table_width()) as f32),
            Mm(y_top as f32),
        )
        .with_mode(PaintMode::Fill),
    );

    layer.set_fill_color(whitesmoke());

    let cells = TABLE_HEADERS.map(str::to_owned);
    draw_row(layer, font, &cells, y_top);
}

/// Draw one table row at `y_top`: an outlined cell per column with its text
/// centred, using the current fill colour.
fn draw_row(layer: &PdfLayerReference, font: &IndirectFontRef, cells: &[String; 5], y_top: f64) {
    let mut column_left = MARGIN_MM;

    for (text, column_width) in cells.iter().zip(COLUMN_WIDTHS_MM) {
        layer.add_rect(
            Rect::new(
                Mm(column_left as f32),
                Mm((y_top - ROW_HEIGHT_MM) as f32),
                Mm((column_left + column_width) as f32),
                Mm(y_top as f32),
            )
            .with_mode(PaintMode::Stroke),
        );

        let text = fit_to_column(text, column_width);
        let text_x = centered_x(column_left, column_width, &text);
        layer.use_text(
            text,
            BODY_FONT_SIZE as f32,
            Mm(text_x as f32),
            Mm((y_top - ROW_HEIGHT_MM + 2.5) as f32),
            font,
        );

        column_left += column_width;
    }
}

fn table_width() -> f64 {
    COLUMN_WIDTHS_MM.iter().sum()
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn grey() -> Color {
    Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None))
}

fn whitesmoke() -> Color {
    Color::Rgb(Rgb::new(0.96, 0.96, 0.96, None))
}

// The builtin fonts expose no glyph metrics, so centring and truncation work
// from an average width of half an em per glyph. Close enough for table
// cells.
fn approx_text_width_mm(text: &str) -> f64 {
    const MM_PER_PT: f64 = 0.3528;

    text.chars().count() as f64 * BODY_FONT_SIZE * 0.5 * MM_PER_PT
}

fn centered_x(column_left: f64, column_width: f64, text: &str) -> f64 {
    let text_width = approx_text_width_mm(text).min(column_width - 2.0);

    column_left + (column_width - text_width) / 2.0
}

fn fit_to_column(text: &str, column_width: f64) -> String {
    if approx_text_width_mm(text) <= column_width - 3.0 {
        return text.to_owned();
    }

    let mut truncated = String::new();

    for character in text.chars() {
        if approx_text_width_mm(&truncated) > column_width - 8.0 {
            break;
        }

        truncated.push(character);
    }

    format!("{}...", truncated.trim_end())
}
