//! Battery voltage to charge percentage.

use crate::config::{
    ADC_FULL_SCALE, ADC_REFERENCE_MV, BATTERY_DIVIDER_RATIO, BATTERY_EMPTY_MV, BATTERY_FULL_MV,
};

/// Cell voltage from a 12-bit SAADC sample taken behind the divider.
///
/// Negative samples (input slightly below ground) read as 0 mV.
pub fn millivolts_from_adc(sample: i16) -> u16 {
    let raw = u32::from(sample.max(0).unsigned_abs());
    let millivolts = raw * ADC_REFERENCE_MV * BATTERY_DIVIDER_RATIO / ADC_FULL_SCALE;
    millivolts.min(u32::from(u16::MAX)) as u16
}

/// Map a cell voltage linearly onto 0..=100 %.
///
/// [`BATTERY_EMPTY_MV`] and below read 0 %, [`BATTERY_FULL_MV`] and above
/// read 100 %. Intermediate values truncate.
pub fn percent_from_millivolts(millivolts: u16) -> u8 {
    if millivolts <= BATTERY_EMPTY_MV {
        return 0;
    }
    if millivolts >= BATTERY_FULL_MV {
        return 100;
    }

    let span = u32::from(BATTERY_FULL_MV - BATTERY_EMPTY_MV);
    let above_empty = u32::from(millivolts - BATTERY_EMPTY_MV);
    (above_empty * 100 / span) as u8
}

#[cfg(test)]
mod tests {
    use super::{millivolts_from_adc, percent_from_millivolts};

    #[test]
    fn range_endpoints() {
        assert_eq!(percent_from_millivolts(3_200), 0);
        assert_eq!(percent_from_millivolts(4_000), 100);
    }

    #[test]
    fn midpoint_is_half() {
        assert_eq!(percent_from_millivolts(3_600), 50);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(percent_from_millivolts(2_900), 0);
        assert_eq!(percent_from_millivolts(0), 0);
        assert_eq!(percent_from_millivolts(4_500), 100);
        assert_eq!(percent_from_millivolts(u16::MAX), 100);
    }

    #[test]
    fn intermediate_values_truncate() {
        // 3.207 V is 0.875 % of the span.
        assert_eq!(percent_from_millivolts(3_207), 0);
        assert_eq!(percent_from_millivolts(3_208), 1);
        assert_eq!(percent_from_millivolts(3_999), 99);
    }

    #[test]
    fn adc_sample_scales_through_divider() {
        assert_eq!(millivolts_from_adc(0), 0);
        assert_eq!(millivolts_from_adc(-12), 0);
        // Half scale is 1.8 V at the pin, 3.6 V at the cell.
        assert_eq!(millivolts_from_adc(2_048), 3_600);
        assert_eq!(millivolts_from_adc(4_095), 7_198);
    }
}
