//! Profit and margin derived from income and the rolled-up cost

use serde::Serialize;

/// Financial position of a cost tree against a revenue figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub income: f64,
    pub total_cost: f64,
    pub profit: f64,
    /// Percentage of income kept as profit; `None` unless income is positive.
    pub margin: Option<f64>,
}

impl FinancialSummary {
    pub fn derive(income: f64, total_cost: f64) -> Self {
        let profit = income - total_cost;
        // overflowed totals give no meaningful percentage
        let margin = (income > 0.0)
            .then(|| profit / income * 100.0)
            .filter(|m| m.is_finite());
        Self {
            income,
            total_cost,
            profit,
            margin,
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.profit >= 0.0
    }

    /// Margin with two decimals and a percent sign, `n/a` when undefined.
    pub fn margin_display(&self) -> String {
        match self.margin {
            Some(m) => format!("{:.2}%", m),
            None => "n/a".to_string(),
        }
    }
}

/// Two-decimal money with thousands separators, e.g. `$ 1,234.50`.
pub fn format_money(currency: &str, value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}.{fraction}")
    } else {
        format!("{sign}{currency} {grouped}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_zero_income_when_deriving_then_margin_is_not_applicable() {
        let summary = FinancialSummary::derive(0.0, 40.0);
        assert_eq!(summary.profit, -40.0);
        assert_eq!(summary.margin, None);
        assert_eq!(summary.margin_display(), "n/a");
    }

    #[test]
    fn given_negative_income_when_deriving_then_margin_is_not_applicable() {
        let summary = FinancialSummary::derive(-10.0, 0.0);
        assert!(summary.margin.is_none());
    }

    #[test]
    fn given_income_100_and_cost_40_when_deriving_then_profit_60_margin_60() {
        let summary = FinancialSummary::derive(100.0, 40.0);
        assert_eq!(summary.profit, 60.0);
        assert_eq!(summary.margin, Some(60.0));
        assert_eq!(summary.margin_display(), "60.00%");
        assert!(summary.is_profitable());
    }

    #[test]
    fn given_cost_above_income_when_deriving_then_negative_margin() {
        let summary = FinancialSummary::derive(50.0, 75.0);
        assert_eq!(summary.profit, -25.0);
        assert_eq!(summary.margin_display(), "-50.00%");
        assert!(!summary.is_profitable());
    }

    #[rstest]
    #[case(100.0, f64::INFINITY)]
    #[case(100.0, f64::NEG_INFINITY)]
    #[case(f64::MIN_POSITIVE, -f64::MAX)]
    fn given_overflowing_figures_when_deriving_then_margin_is_not_applicable(
        #[case] income: f64,
        #[case] total_cost: f64,
    ) {
        let summary = FinancialSummary::derive(income, total_cost);
        assert_eq!(summary.margin, None);
        assert_eq!(summary.margin_display(), "n/a");
    }

    #[rstest]
    #[case(0.0, "$ 0.00")]
    #[case(5.5, "$ 5.50")]
    #[case(1234.5, "$ 1,234.50")]
    #[case(1234567.891, "$ 1,234,567.89")]
    #[case(-60.0, "-$ 60.00")]
    #[case(-0.001, "$ 0.00")]
    fn given_value_when_formatting_money_then_two_decimals_grouped(
        #[case] value: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(format_money("$", value), expected);
    }

    #[test]
    fn given_empty_currency_when_formatting_then_no_symbol() {
        assert_eq!(format_money("", 999.0), "999.00");
    }
}
