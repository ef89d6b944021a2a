//! The maud view for the home page.

use maud::{Markup, html};

use crate::{
    endpoints,
    expense::Expense,
    html::{
        BUTTON_DANGER_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    report::Aggregate,
};

const PAYMENT_MODES: [&str; 4] = ["Card", "Cash", "UPI", "Other"];

/// Render the home page from the current month's aggregate figures and the
/// full expense history (all months, newest first).
pub fn home_view(aggregate: &Aggregate, expenses: &[Expense]) -> Markup {
    let content = html! {
        h1 { "Expenseur" }

        (summary_card(aggregate))
        (add_expense_form())
        (budget_forms())
        (history_table(expenses))
    };

    base("Home", &content)
}

fn summary_card(aggregate: &Aggregate) -> Markup {
    let remaining_class = if aggregate.remaining < 0.0 {
        "summary-figure summary-negative"
    } else {
        "summary-figure"
    };

    html! {
        div class=(CARD_STYLE)
        {
            div class="summary-grid"
            {
                div
                {
                    p { "Total Spent This Month" }
                    p class="summary-figure" { (format_currency(aggregate.total_spent)) }
                }

                div
                {
                    p { "Budget" }
                    p class="summary-figure" { (format_currency(aggregate.budget_amount)) }
                }

                div
                {
                    p { "Remaining" }
                    p class=(remaining_class) { (format_currency(aggregate.remaining)) }
                }
            }

            p
            {
                a href=(endpoints::DOWNLOAD_PDF) { "Download this month as a PDF report" }
            }
        }
    }
}

fn add_expense_form() -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h2 { "Add Expense" }

            form method="post" action=(endpoints::ROOT)
            {
                div class="form-row"
                {
                    div
                    {
                        label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                        input
                            id="amount"
                            type="number"
                            name="amount"
                            step="0.01"
                            min="0"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                        input
                            id="description"
                            type="text"
                            name="description"
                            placeholder="e.g. Uber ride"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                        input
                            id="date"
                            type="date"
                            name="date"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="payment_mode" class=(FORM_LABEL_STYLE) { "Payment Mode" }
                        select id="payment_mode" name="payment_mode" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for mode in PAYMENT_MODES {
                                option value=(mode) { (mode) }
                            }
                        }
                    }
                }

                p { "The category is assigned automatically from the description." }

                button type="submit" name="add_expense" value="1" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Add Expense"
                }
            }
        }
    }
}

fn budget_forms() -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h2 { "Monthly Budget" }

            form method="post" action=(endpoints::ROOT)
            {
                div class="form-row"
                {
                    div
                    {
                        label for="budget_amount" class=(FORM_LABEL_STYLE) { "Budget Amount" }
                        input
                            id="budget_amount"
                            type="number"
                            name="budget_amount"
                            step="0.01"
                            min="0"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                button type="submit" name="set_budget" value="1" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Set Budget"
                }
            }

            form method="post" action=(endpoints::ROOT)
            {
                p { "Remove every expense recorded this month. This cannot be undone." }

                button type="submit" name="reset_month" value="1" class=(BUTTON_DANGER_STYLE)
                {
                    "Reset Current Month"
                }
            }
        }
    }
}

fn history_table(expenses: &[Expense]) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h2 { "Expense History" }

            table
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Date" }
                        th class=(TABLE_CELL_STYLE) { "Description" }
                        th class=(TABLE_CELL_STYLE) { "Category" }
                        th class=(TABLE_CELL_STYLE) { "Payment Mode" }
                        th class=(TABLE_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="5"
                            {
                                "Nothing here yet. Add your first expense above."
                            }
                        }
                    }

                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (expense.date) }
                            td class=(TABLE_CELL_STYLE) { (expense.description) }
                            td class=(TABLE_CELL_STYLE) { (expense.category) }
                            td class=(TABLE_CELL_STYLE) { (expense.payment_mode) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod home_view_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{expense::Expense, report::Aggregate};

    use super::home_view;

    fn sample_aggregate() -> Aggregate {
        Aggregate {
            total_spent: 250.0,
            budget_amount: 1000.0,
            remaining: 750.0,
        }
    }

    fn render(aggregate: &Aggregate, expenses: &[Expense]) -> Html {
        Html::parse_document(&home_view(aggregate, expenses).into_string())
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[test]
    fn shows_aggregate_figures() {
        let html = render(&sample_aggregate(), &[]);

        assert_valid_html(&html);

        let figure_selector = Selector::parse(".summary-figure").unwrap();
        let figures: Vec<String> = html
            .select(&figure_selector)
            .map(|figure| figure.text().collect::<String>().trim().to_owned())
            .collect();

        assert_eq!(figures, vec!["$250.00", "$1,000.00", "$750.00"]);
    }

    #[test]
    fn negative_remaining_is_highlighted() {
        let aggregate = Aggregate {
            total_spent: 250.0,
            budget_amount: 0.0,
            remaining: -250.0,
        };

        let html = render(&aggregate, &[]);

        let negative_selector = Selector::parse(".summary-negative").unwrap();
        let negative: Vec<String> = html
            .select(&negative_selector)
            .map(|figure| figure.text().collect::<String>().trim().to_owned())
            .collect();

        assert_eq!(negative, vec!["-$250.00"]);
    }

    #[test]
    fn renders_form_fields_for_every_action() {
        let html = render(&sample_aggregate(), &[]);

        for (selector, description) in [
            ("input[name='amount']", "amount input"),
            ("input[name='description']", "description input"),
            ("input[name='date']", "date input"),
            ("select[name='payment_mode']", "payment mode select"),
            ("button[name='add_expense']", "add expense button"),
            ("input[name='budget_amount']", "budget amount input"),
            ("button[name='set_budget']", "set budget button"),
            ("button[name='reset_month']", "reset month button"),
        ] {
            let selector = Selector::parse(selector).unwrap();
            assert!(
                html.select(&selector).next().is_some(),
                "Could not find {description} in home page"
            );
        }
    }

    #[test]
    fn renders_one_table_row_per_expense() {
        let expenses = vec![
            Expense {
                id: 1,
                amount: 250.0,
                description: "Uber ride".to_owned(),
                date: date!(2024 - 03 - 15),
                payment_mode: "Card".to_owned(),
                category: "Transport".to_owned(),
            },
            Expense {
                id: 2,
                amount: 12.5,
                description: "coffee".to_owned(),
                date: date!(2024 - 03 - 14),
                payment_mode: "Cash".to_owned(),
                category: "Food".to_owned(),
            },
        ];

        let html = render(&sample_aggregate(), &expenses);

        let row_selector = Selector::parse("tbody tr").unwrap();
        let rows: Vec<String> = html
            .select(&row_selector)
            .map(|row| row.text().collect::<String>())
            .collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Uber ride"));
        assert!(rows[0].contains("Transport"));
        assert!(rows[0].contains("$250.00"));
        assert!(rows[1].contains("coffee"));
    }

    #[test]
    fn empty_history_shows_prompt_text() {
        let html = render(&sample_aggregate(), &[]);

        let cell_selector = Selector::parse("td[colspan='5']").unwrap();
        let cell = html
            .select(&cell_selector)
            .next()
            .expect("Could not find the no-data table cell");

        assert!(
            cell.text()
                .collect::<String>()
                .contains("Add your first expense")
        );
    }
}
