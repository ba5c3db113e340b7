/// Advisory duration estimates handed back to the client at submission time.
/// They only drive the client-side progress simulation; the executor itself
/// never consults them.
///
/// Report jobs are assumed to cost a flat 20 ms per item. Revalidation jobs are
/// dominated by the rate-limit pauses (60 s after every 3rd item), so the
/// estimate is the pause budget spread over the item count.
pub fn report_estimate_ms(item_count: usize) -> i64 {
    item_count as i64 * 20
}

pub fn revalidation_estimate_ms(item_count: usize) -> i64 {
    item_count as i64 * 60_000 / 3
}

#[cfg(test)]
mod tests {
    use super::{report_estimate_ms, revalidation_estimate_ms};

    #[test]
    fn report_estimate_is_20ms_per_item() {
        assert_eq!(report_estimate_ms(0), 0);
        assert_eq!(report_estimate_ms(50), 1_000);
    }

    #[test]
    fn revalidation_estimate_follows_pause_budget() {
        // 7 items: two full pause windows plus a third partial one.
        assert_eq!(revalidation_estimate_ms(7), 140_000);
        assert_eq!(revalidation_estimate_ms(3), 60_000);
        assert_eq!(revalidation_estimate_ms(0), 0);
    }
}
