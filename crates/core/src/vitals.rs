//! Mock vitals and their risk scores.
//!
//! Vitals are derived from the patient identifier with fixed modular formulas so they stay stable
//! across requests. Scores map each current vital onto `[0, 1]` with a clamped linear ramp and are
//! appended to the causal-context probabilities on the bell-curve chart.

use crate::random;

/// A set of vital signs. Any field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VitalSigns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp_systolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp_diastolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spo2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VitalsSnapshot {
    pub current: VitalSigns,
    pub predicted: VitalSigns,
}

/// Maps a patient id onto the integer used by the vitals formulas.
///
/// Numeric ids, negative ones included, are used directly. Anything else falls back to the
/// 24-bit digest prefix of `vitals:{id}` so every id still gets stable vitals.
pub fn patient_number(patient_id: &str) -> i128 {
    let trimmed = patient_id.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed
        .parse::<i128>()
        .unwrap_or_else(|_| i128::from(random::digest_prefix(&format!("vitals:{trimmed}"))))
}

/// Generates deterministic current and predicted vitals for a patient.
pub fn generate_mock_vitals(patient_id: &str) -> VitalsSnapshot {
    let pid = patient_number(patient_id);
    // (pid * k) mod m, non-negative for negative ids and without overflow for large ones.
    let cycle = |k: i128, m: i128| (pid.rem_euclid(m) * k).rem_euclid(m) as i64;

    let heart_rate = 60 + cycle(7, 40);
    let bp_systolic = 100 + cycle(3, 40);
    let bp_diastolic = 60 + cycle(2, 25);
    let spo2 = 94 + cycle(5, 6);
    let temperature = round1(36.5 + cycle(11, 8) as f64 / 10.0);

    let heart_rate_pred = heart_rate + (cycle(13, 5) - 2);
    let bp_systolic_pred = bp_systolic + (cycle(17, 6) - 3);
    let bp_diastolic_pred = bp_diastolic + (cycle(19, 5) - 2);
    let spo2_pred = (spo2 + (cycle(23, 3) - 1)).clamp(90, 99);
    let temperature_pred = round1(temperature + (cycle(29, 3) - 1) as f64 * 0.1);

    VitalsSnapshot {
        current: VitalSigns {
            heart_rate: Some(heart_rate as f64),
            bp_systolic: Some(bp_systolic as f64),
            bp_diastolic: Some(bp_diastolic as f64),
            spo2: Some(spo2 as f64),
            temperature: Some(temperature),
        },
        predicted: VitalSigns {
            heart_rate: Some(heart_rate_pred as f64),
            bp_systolic: Some(bp_systolic_pred as f64),
            bp_diastolic: Some(bp_diastolic_pred as f64),
            spo2: Some(spo2_pred as f64),
            temperature: Some(temperature_pred),
        },
    }
}

/// Maps current vitals to risk scores in `[0, 1]`.
///
/// Order: heart rate, systolic, diastolic, SpO2 (inverted), temperature. Missing vitals are
/// skipped rather than padded.
pub fn map_to_scores(vitals: &VitalsSnapshot) -> Vec<f64> {
    let cur = &vitals.current;
    [
        cur.heart_rate.map(|v| (v - 50.0) / 80.0),
        cur.bp_systolic.map(|v| (v - 90.0) / 70.0),
        cur.bp_diastolic.map(|v| (v - 60.0) / 30.0),
        cur.spo2.map(|v| (100.0 - v) / 20.0),
        cur.temperature.map(|v| (v - 36.5) / 2.0),
    ]
    .into_iter()
    .flatten()
    .map(clamp_unit)
    .collect()
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
