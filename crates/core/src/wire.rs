//! Conversions from core domain types into `api-shared` wire types.

use crate::blend::CausalContextRecord;
use crate::context::HistoryEntry;
use crate::patient::{PatientReport, RelationSummary};
use crate::vitals::{VitalSigns, VitalsSnapshot};
use api_shared::{
    ContextRecord, HistoryItem, PatientReportRes, RelationRes, VitalSignsRes, VitalsRes,
};

impl From<&CausalContextRecord> for ContextRecord {
    fn from(record: &CausalContextRecord) -> Self {
        ContextRecord {
            disease: record.disease.as_str().to_string(),
            probability: record.probability,
            narrative: record.narrative.clone(),
            source: record.source.as_str().to_string(),
        }
    }
}

impl From<&HistoryEntry> for HistoryItem {
    fn from(entry: &HistoryEntry) -> Self {
        HistoryItem {
            disease: entry.disease.clone(),
            diagnosed_on: entry.diagnosed_on.clone(),
        }
    }
}

impl From<RelationSummary> for RelationRes {
    fn from(summary: RelationSummary) -> Self {
        RelationRes {
            present_disease: summary.present_disease.into_string(),
            previous_disease: summary.previous_disease.into_string(),
            probability: summary.probability,
            report: summary.report,
        }
    }
}

impl From<&VitalSigns> for VitalSignsRes {
    fn from(v: &VitalSigns) -> Self {
        VitalSignsRes {
            heart_rate: v.heart_rate,
            bp_systolic: v.bp_systolic,
            bp_diastolic: v.bp_diastolic,
            spo2: v.spo2,
            temperature: v.temperature,
        }
    }
}

impl From<&VitalsSnapshot> for VitalsRes {
    fn from(v: &VitalsSnapshot) -> Self {
        VitalsRes {
            current: (&v.current).into(),
            predicted: (&v.predicted).into(),
        }
    }
}

impl From<PatientReport> for PatientReportRes {
    fn from(report: PatientReport) -> Self {
        let chart_values = report.chart_values();
        let records = |list: &[CausalContextRecord]| -> Vec<ContextRecord> {
            list.iter().map(ContextRecord::from).collect()
        };
        let history =
            |list: &[HistoryEntry]| -> Vec<HistoryItem> { list.iter().map(HistoryItem::from).collect() };

        PatientReportRes {
            region: report.region,
            relation_data: report.relation_data.into_iter().map(Into::into).collect(),
            auto_history: history(&report.auto_history),
            report_history: history(&report.report_history),
            state_context: records(&report.context.state_context),
            auto_context: records(&report.context.auto_context),
            report_context: records(&report.context.report_context),
            vitals: (&report.vitals).into(),
            vital_scores: report.vital_scores,
            chart_values,
            patient: report.patient,
        }
    }
}
