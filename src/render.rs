use chrono::Weekday;

use crate::consolidate::ConsolidatedTable;

pub static WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "Понедельник"),
    (Weekday::Tue, "Вторник"),
    (Weekday::Wed, "Среда"),
    (Weekday::Thu, "Четверг"),
    (Weekday::Fri, "Пятница"),
    (Weekday::Sat, "Суббота"),
    (Weekday::Sun, "Воскресенье"),
];
pub static PLACEHOLDER: &str = "—";
pub static DEPARTURE_FORMAT: &str = "%H:%M";
static CURRENCY: &str = "₽";
static DEPARTURE_LABEL: &str = "Время отправления";
static CAPTION: &str = "Минимальные тарифы «Сапсан» Москва → Санкт-Петербург";

static STYLE: &str = r#"
    :root {
      color-scheme: light dark;
      --accent: #e53935;
      --bg: #ffffff;
      --bg-dark: #121212;
      --text: #1a1a1a;
      --text-dark: #f5f5f5;
      font-family: "Segoe UI", "Roboto", "Helvetica Neue", Arial, sans-serif;
    }
    body {
      background: var(--bg);
      color: var(--text);
      margin: 0;
      padding: 1rem;
    }
    @media (prefers-color-scheme: dark) {
      body {
        background: var(--bg-dark);
        color: var(--text-dark);
      }
      .table-wrapper {
        background: rgba(31, 31, 31, 0.9);
      }
      table {
        background: #1f1f1f;
      }
      .empty {
        color: rgba(255, 255, 255, 0.45);
      }
    }
    .table-wrapper {
      max-width: 100%;
      overflow-x: auto;
      border-radius: 16px;
      box-shadow: 0 20px 45px rgba(20, 30, 55, 0.12);
      background: rgba(255, 255, 255, 0.9);
      backdrop-filter: blur(12px);
    }
    table {
      width: 100%;
      border-collapse: collapse;
      min-width: 720px;
    }
    caption {
      text-align: left;
      padding: 1rem;
      font-size: 1.3rem;
      font-weight: 600;
      color: var(--accent);
    }
    th,
    td {
      padding: 0.9rem 1rem;
      border-bottom: 1px solid rgba(0, 0, 0, 0.08);
      text-align: left;
      font-size: 0.95rem;
    }
    th {
      font-weight: 600;
      background: rgba(229, 57, 53, 0.08);
    }
    tbody tr:hover {
      background: rgba(229, 57, 53, 0.12);
      transition: background 0.3s ease;
    }
    .empty {
      color: rgba(0, 0, 0, 0.45);
      font-style: italic;
    }
    @media (max-width: 768px) {
      table {
        min-width: unset;
        border-collapse: separate;
        border-spacing: 0;
      }
      thead {
        display: none;
      }
      tbody tr {
        display: grid;
        grid-template-columns: repeat(2, minmax(0, 1fr));
        gap: 0.5rem;
        padding: 1rem;
        border-bottom: 1px solid rgba(0, 0, 0, 0.12);
      }
      tbody tr th {
        display: block;
        background: none;
        padding: 0;
        font-size: 1.1rem;
        color: var(--accent);
      }
      tbody tr td {
        display: flex;
        justify-content: space-between;
        align-items: center;
        padding: 0.35rem 0;
        border: none;
      }
      tbody tr td::before {
        content: attr(data-label);
        font-weight: 600;
        margin-right: 0.75rem;
      }
    }
"#;

/// Whole roubles grouped by thousands, e.g. `12 345 ₽`.
pub fn format_price(price: f64) -> String {
    let digits = (price.trunc() as i64).to_string();
    let mut grouped = String::new();

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    format!("{} {}", grouped, CURRENCY)
}

fn render_rows(quotes: &ConsolidatedTable) -> String {
    let mut rows = String::new();

    for (departure, cells) in quotes.iter() {
        rows.push_str(&format!(
            "        <tr><th scope=\"row\" data-label=\"{}\">{}</th>",
            DEPARTURE_LABEL,
            departure.format(DEPARTURE_FORMAT)
        ));
        for (weekday, label) in WEEKDAYS.iter() {
            let cell = match cells.get(weekday) {
                Some(quote) => format!(
                    "<td data-label=\"{}\">{}</td>",
                    label,
                    format_price(quote.price)
                ),
                None => format!(
                    "<td class=\"empty\" data-label=\"{}\">{}</td>",
                    label, PLACEHOLDER
                ),
            };
            rows.push_str(&cell);
        }
        rows.push_str("</tr>\n");
    }
    rows
}

/// Self-contained HTML page: inline styles only, no scripts or external
/// resources.
pub fn build_table(quotes: &ConsolidatedTable) -> String {
    let mut header = format!("          <th scope=\"col\">{}</th>\n", DEPARTURE_LABEL);
    for (_, label) in WEEKDAYS.iter() {
        header.push_str(&format!("          <th scope=\"col\">{}</th>\n", label));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>{style}  </style>
</head>
<body>
  <div class="table-wrapper">
    <table>
      <caption>{caption}</caption>
      <thead>
        <tr>
{header}        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
  </div>
</body>
</html>
"#,
        style = STYLE,
        caption = CAPTION,
        header = header,
        rows = render_rows(quotes),
    )
}
