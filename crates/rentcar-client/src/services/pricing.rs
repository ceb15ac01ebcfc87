use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::Car;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub days: u32,
    pub base_price: f64,
    pub driver_fee: f64,
    pub total: f64,
}

/// Number of billable days between two instants, rounded up. Same-day or
/// inverted ranges bill a single day.
pub fn billable_days(start: NaiveDateTime, end: NaiveDateTime) -> u32 {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Rental cost for a date range. Never fails; date validity is checked separately.
pub fn compute_price(
    price_per_day: f64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    with_driver: bool,
    driver_price_per_day: Option<f64>,
) -> PriceBreakdown {
    let days = billable_days(start, end);
    let base_price = f64::from(days) * price_per_day;
    let driver_fee = if with_driver {
        f64::from(days) * driver_price_per_day.unwrap_or(0.0)
    } else {
        0.0
    };

    PriceBreakdown {
        days,
        base_price,
        driver_fee,
        total: base_price + driver_fee,
    }
}

/// Quote for a specific car. The driver fee only applies when the car offers one.
pub fn quote_for_car(
    car: &Car,
    start: NaiveDateTime,
    end: NaiveDateTime,
    with_driver: bool,
) -> PriceBreakdown {
    compute_price(
        car.price_per_day,
        start,
        end,
        with_driver && car.with_driver,
        car.driver_price_per_day,
    )
}

/// Whole US dollars with thousands separators, e.g. `$1,250`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn totals_add_up() {
        let p = compute_price(50.0, at(2026, 11, 1, 0), at(2026, 11, 4, 0), true, Some(20.0));
        assert_eq!(p.days, 3);
        assert_eq!(p.base_price, 150.0);
        assert_eq!(p.driver_fee, 60.0);
        assert_eq!(p.total, p.base_price + p.driver_fee);
    }

    #[test]
    fn same_day_is_clamped_to_one() {
        let p = compute_price(40.0, at(2026, 11, 1, 0), at(2026, 11, 1, 0), false, None);
        assert_eq!(p.days, 1);
        assert_eq!(p.total, 40.0);
    }

    #[test]
    fn inverted_range_is_clamped_to_one() {
        let p = compute_price(40.0, at(2026, 11, 5, 0), at(2026, 11, 1, 0), false, None);
        assert_eq!(p.days, 1);
    }

    #[test]
    fn partial_days_round_up() {
        assert_eq!(billable_days(at(2026, 11, 1, 10), at(2026, 11, 2, 11)), 2);
        assert_eq!(billable_days(at(2026, 11, 1, 10), at(2026, 11, 1, 11)), 1);
    }

    #[test]
    fn driver_without_rate_costs_nothing() {
        let p = compute_price(30.0, at(2026, 1, 1, 0), at(2026, 1, 3, 0), true, None);
        assert_eq!(p.driver_fee, 0.0);
        assert_eq!(p.total, 60.0);
    }

    #[test]
    fn quote_ignores_driver_when_car_has_none() {
        let car: Car = serde_json::from_value(serde_json::json!({
            "_id": "c1",
            "name": "Vitz",
            "pricePerDay": 25,
            "withDriver": false,
            "driverPricePerDay": 15
        }))
        .unwrap();
        let p = quote_for_car(&car, at(2026, 1, 1, 0), at(2026, 1, 3, 0), true);
        assert_eq!(p.driver_fee, 0.0);
        assert_eq!(p.total, 50.0);
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1250.0), "$1,250");
        assert_eq!(format_currency(1234567.0), "$1,234,567");
        assert_eq!(format_currency(-1500.0), "-$1,500");
    }
}
