use crate::core::interval::MonthWindow;
use crate::domain::model::{Booking, House, UsageRecord};
use std::collections::HashMap;

/// Booked days per house over `window`, one record per house in `houses` order.
///
/// Only active bookings that intersect the window count. Overlapping bookings
/// for the same house are summed independently, so a house can report more
/// booked days than the month has.
pub fn compute_usage(houses: &[House], bookings: &[Booking], window: &MonthWindow) -> Vec<UsageRecord> {
    let month = window.label();
    let total_days = window.total_days();

    let mut days_by_house: HashMap<i64, i64> = HashMap::new();
    for booking in bookings
        .iter()
        .filter(|b| b.is_active() && b.intersects(window))
    {
        let days = booking.overlap_days(window);
        if days == 0 {
            continue;
        }
        *days_by_house.entry(booking.house_id).or_insert(0) += days;
    }

    houses
        .iter()
        .map(|house| {
            let days_with_bookings = days_by_house.get(&house.id).copied().unwrap_or(0);
            UsageRecord {
                house_id: house.id,
                house_name: house.name.clone(),
                month: month.clone(),
                days_with_bookings,
                total_days,
                usage_rate: usage_rate(days_with_bookings, total_days),
            }
        })
        .collect()
}

fn usage_rate(days: i64, total_days: i64) -> f64 {
    if total_days == 0 {
        return 0.0;
    }
    days as f64 / total_days as f64
}
