//! Output formatting for the CLI.

use cartkeep::Cart;
use console::style;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print the cart as a table, or as its persisted JSON in JSON mode.
    pub fn cart(&self, cart: &Cart) {
        if self.json {
            self.json(cart);
            return;
        }

        if cart.is_empty() {
            self.info("Cart is empty");
            return;
        }

        let rows: Vec<[String; 4]> = cart
            .iter()
            .map(|item| {
                [
                    item.id.to_string(),
                    item.title.clone(),
                    format_price(item.price),
                    item.quantity.to_string(),
                ]
            })
            .collect();
        let headers = ["ID", "TITLE", "PRICE", "QTY"];
        let widths = column_widths(&headers, &rows);

        self.table_row(&headers, &widths);
        for row in &rows {
            let cols: Vec<&str> = row.iter().map(String::as_str).collect();
            self.table_row(&cols, &widths);
        }
        println!(
            "\n  {} line(s), {} unit(s)",
            style(cart.len()).bold(),
            style(cart.item_count()).bold()
        );
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Format a unit price with two decimals.
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

fn column_widths(headers: &[&str; 4], rows: &[[String; 4]]) -> Vec<usize> {
    (0..headers.len())
        .map(|i| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(headers[i].len()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(20.0), "20.00");
        assert_eq!(format_price(8.5), "8.50");
    }

    #[test]
    fn test_column_widths() {
        let headers = ["ID", "TITLE", "PRICE", "QTY"];
        let rows = vec![[
            "p1".to_string(),
            "A long title".to_string(),
            "20.00".to_string(),
            "12".to_string(),
        ]];

        assert_eq!(column_widths(&headers, &rows), vec![2, 12, 5, 3]);
    }
}
