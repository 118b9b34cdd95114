// Gas cost rendering.
//
// Two separate paths on purpose:
// - `annotate_gas_used` is the per-field display annotation, floating point, shortest
//   rendering (`"0.00018 SUI"`);
// - `summarize_gas` is exact integer arithmetic including the net total, fixed six
//   decimals (`"0.000180 SUI"`).

use serde::{Deserialize, Serialize};

use crate::decimals::parse_amount;
use crate::error::AnnotateError;
use crate::models::{without_keys, AnnotatedGasCostSummary, GasCostSummary};

pub const MIST_PER_SUI: i128 = 1_000_000_000;
const MIST_DECIMALS: u32 = 9;

/// Fractional digits of the SUI figures produced by [`summarize_gas`].
pub const SUMMARY_FRACTION_DIGITS: u32 = 6;

const DERIVED_KEYS: [&str; 8] = [
    "computationCostInMist",
    "computationCostInSui",
    "storageCostInMist",
    "storageCostInSui",
    "storageRebateInMist",
    "storageRebateInSui",
    "nonRefundableStorageFeeInMist",
    "nonRefundableStorageFeeInSui",
];

/// Add `<field>InMist` and `<field>InSui` next to every gas field present.
pub fn annotate_gas_used(gas: &GasCostSummary) -> AnnotatedGasCostSummary {
    let (computation_cost_in_mist, computation_cost_in_sui) = with_units(gas.computation_cost.as_deref());
    let (storage_cost_in_mist, storage_cost_in_sui) = with_units(gas.storage_cost.as_deref());
    let (storage_rebate_in_mist, storage_rebate_in_sui) = with_units(gas.storage_rebate.as_deref());
    let (non_refundable_storage_fee_in_mist, non_refundable_storage_fee_in_sui) =
        with_units(gas.non_refundable_storage_fee.as_deref());

    AnnotatedGasCostSummary {
        gas: GasCostSummary {
            extra: without_keys(&gas.extra, &DERIVED_KEYS),
            ..gas.clone()
        },
        computation_cost_in_mist,
        computation_cost_in_sui,
        storage_cost_in_mist,
        storage_cost_in_sui,
        storage_rebate_in_mist,
        storage_rebate_in_sui,
        non_refundable_storage_fee_in_mist,
        non_refundable_storage_fee_in_sui,
    }
}

fn with_units(value: Option<&str>) -> (Option<String>, Option<Option<String>>) {
    let Some(value) = value else {
        return (None, None);
    };

    let in_mist = format!("{} MIST", value.trim());
    let in_sui = parse_amount(value).map(|mist| format!("{} SUI", mist / MIST_PER_SUI as f64));
    (Some(in_mist), Some(in_sui))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasInMist {
    pub computation_cost_in_mist: String,
    pub storage_cost_in_mist: String,
    pub storage_rebate_in_mist: String,
    pub non_refundable_storage_fee_in_mist: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasInSui {
    pub computation_cost_in_sui: String,
    pub storage_cost_in_sui: String,
    pub storage_rebate_in_sui: String,
    pub non_refundable_storage_fee_in_sui: String,
}

/// Exact gas breakdown plus the net amount paid
/// (`computation + storage - rebate`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasUsageSummary {
    pub gas_used_in_mist: GasInMist,
    pub gas_used_in_sui: GasInSui,
    pub total_gas_used_in_mist: String,
    pub total_gas_used_in_sui: String,
}

/// Absent fields count as zero; present fields must be integers.
pub fn summarize_gas(gas: &GasCostSummary) -> Result<GasUsageSummary, AnnotateError> {
    let computation = parse_mist("computationCost", gas.computation_cost.as_deref())?;
    let storage = parse_mist("storageCost", gas.storage_cost.as_deref())?;
    let rebate = parse_mist("storageRebate", gas.storage_rebate.as_deref())?;
    let non_refundable = parse_mist("nonRefundableStorageFee", gas.non_refundable_storage_fee.as_deref())?;

    let total = computation
        .checked_add(storage)
        .and_then(|sum| sum.checked_sub(rebate))
        .ok_or_else(|| AnnotateError::AmountOverflow("totalGasUsed".to_string()))?;

    Ok(GasUsageSummary {
        gas_used_in_mist: GasInMist {
            computation_cost_in_mist: mist_label(computation),
            storage_cost_in_mist: mist_label(storage),
            storage_rebate_in_mist: mist_label(rebate),
            non_refundable_storage_fee_in_mist: mist_label(non_refundable),
        },
        gas_used_in_sui: GasInSui {
            computation_cost_in_sui: sui_label(computation),
            storage_cost_in_sui: sui_label(storage),
            storage_rebate_in_sui: sui_label(rebate),
            non_refundable_storage_fee_in_sui: sui_label(non_refundable),
        },
        total_gas_used_in_mist: mist_label(total),
        total_gas_used_in_sui: sui_label(total),
    })
}

fn parse_mist(field: &str, value: Option<&str>) -> Result<i128, AnnotateError> {
    match value {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse::<i128>()
            .map_err(|_| AnnotateError::invalid_amount(field, raw)),
    }
}

fn mist_label(mist: i128) -> String {
    format!("{mist} MIST")
}

fn sui_label(mist: i128) -> String {
    format!("{} SUI", format_mist_fixed(mist, SUMMARY_FRACTION_DIGITS))
}

/// Render MIST as SUI with `fraction_digits` decimals, rounding half away from zero
/// in integer arithmetic.
pub fn format_mist_fixed(mist: i128, fraction_digits: u32) -> String {
    let fraction_digits = fraction_digits.min(MIST_DECIMALS);
    let step = 10u128.pow(MIST_DECIMALS - fraction_digits);
    let units = (mist.unsigned_abs() + step / 2) / step;

    let scale = 10u128.pow(fraction_digits);
    let whole = units / scale;
    let fraction = units % scale;
    let sign = if mist < 0 && units != 0 { "-" } else { "" };

    if fraction_digits == 0 {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction:0width$}", width = fraction_digits as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_gas() -> GasCostSummary {
        GasCostSummary {
            computation_cost: Some("180000".to_string()),
            storage_cost: Some("19000".to_string()),
            storage_rebate: Some("-200".to_string()),
            non_refundable_storage_fee: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_annotate_gas_used_float_rendering() {
        let annotated = annotate_gas_used(&sample_gas());

        assert_eq!(annotated.computation_cost_in_sui, Some(Some("0.00018 SUI".to_string())));
        assert_eq!(annotated.computation_cost_in_mist.as_deref(), Some("180000 MIST"));
        assert_eq!(annotated.storage_cost_in_sui, Some(Some("0.000019 SUI".to_string())));
        assert_eq!(annotated.storage_rebate_in_mist.as_deref(), Some("-200 MIST"));
        assert_eq!(annotated.storage_rebate_in_sui, Some(Some("-0.0000002 SUI".to_string())));
        assert_eq!(annotated.non_refundable_storage_fee_in_mist, None);
        assert_eq!(annotated.gas.computation_cost.as_deref(), Some("180000"));
    }

    #[test]
    fn test_annotate_gas_used_serialized_shape() {
        let value = serde_json::to_value(annotate_gas_used(&sample_gas())).unwrap();

        assert_eq!(value["computationCost"], "180000");
        assert_eq!(value["computationCostInSui"], "0.00018 SUI");
        assert!(value.get("nonRefundableStorageFeeInSui").is_none());
    }

    #[test]
    fn test_unparseable_gas_field_marks_sui_as_null() {
        let gas = GasCostSummary {
            storage_cost: Some("n/a".to_string()),
            ..sample_gas()
        };

        let annotated = annotate_gas_used(&gas);
        assert_eq!(annotated.storage_cost_in_sui, Some(None));

        let value = serde_json::to_value(&annotated).unwrap();
        assert_eq!(value["storageCostInMist"], "n/a MIST");
        assert!(value["storageCostInSui"].is_null());
        assert!(value.as_object().unwrap().contains_key("storageCostInSui"));
        // Absent fields stay absent.
        assert!(!value.as_object().unwrap().contains_key("nonRefundableStorageFeeInSui"));
    }

    #[test]
    fn test_annotate_gas_used_is_stable_on_reannotation() {
        let first = annotate_gas_used(&sample_gas());
        let reparsed: GasCostSummary = serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();

        assert_eq!(annotate_gas_used(&reparsed), first);
    }

    #[test]
    fn test_summarize_gas_exact_rendering() {
        let summary = summarize_gas(&sample_gas()).unwrap();

        assert_eq!(summary.gas_used_in_sui.computation_cost_in_sui, "0.000180 SUI");
        assert_eq!(summary.gas_used_in_sui.storage_cost_in_sui, "0.000019 SUI");
        assert_eq!(summary.gas_used_in_sui.storage_rebate_in_sui, "0.000000 SUI");
        assert_eq!(summary.gas_used_in_mist.computation_cost_in_mist, "180000 MIST");
        assert_eq!(summary.gas_used_in_mist.non_refundable_storage_fee_in_mist, "0 MIST");
        assert_eq!(summary.total_gas_used_in_mist, "199200 MIST");
        assert_eq!(summary.total_gas_used_in_sui, "0.000199 SUI");
    }

    #[test]
    fn test_summarize_gas_rejects_non_integers() {
        let gas = GasCostSummary {
            storage_cost: Some("1.5".to_string()),
            ..sample_gas()
        };

        let err = summarize_gas(&gas).unwrap_err();
        assert!(matches!(err, AnnotateError::InvalidAmount { ref field, .. } if field == "storageCost"));
    }

    #[test]
    fn test_summarize_gas_handles_values_beyond_f64_precision() {
        let gas = GasCostSummary {
            computation_cost: Some("9007199254740993000".to_string()),
            storage_cost: Some("0".to_string()),
            storage_rebate: Some("0".to_string()),
            non_refundable_storage_fee: Some("0".to_string()),
            extra: Default::default(),
        };

        let summary = summarize_gas(&gas).unwrap();
        assert_eq!(summary.total_gas_used_in_mist, "9007199254740993000 MIST");
        assert_eq!(summary.total_gas_used_in_sui, "9007199254.740993 SUI");
    }

    #[test]
    fn test_format_mist_fixed_rounding() {
        assert_eq!(format_mist_fixed(1_000_000_000, 6), "1.000000");
        assert_eq!(format_mist_fixed(1_999_999_500, 6), "2.000000");
        assert_eq!(format_mist_fixed(1_500, 6), "0.000002");
        assert_eq!(format_mist_fixed(-2_500_000_000, 6), "-2.500000");
        assert_eq!(format_mist_fixed(-400, 6), "0.000000");
        assert_eq!(format_mist_fixed(123, 9), "0.000000123");
        assert_eq!(format_mist_fixed(2_600_000_000, 0), "3");
    }
}
