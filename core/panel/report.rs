


/*  > ---------------------------------------------------------------------------------------------
    | renders a StatisticsReport either as the json analytics payload or as
    | a three sheet workbook, both are built from the same AnalyticsResponse
    | so the numbers in the json and in the sheets can't drift apart
    |
    |   json  ---> application/json text body
    |   excel ---> Sheet model ---> WorkbookWriter ---> xlsx bytes
    |
*/


use std::sync::Arc;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use crate::constants::*;
use crate::error::ExportError;
use crate::models::stats::StatisticsReport;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat{
    Json,
    Excel,
}

impl ExportFormat{

    /* anything we don't know is served as json */
    pub fn parse(raw: Option<&str>) -> Self{
        match raw.map(str::trim){
            None | Some("") | Some("json") => ExportFormat::Json,
            Some("excel") => ExportFormat::Excel,
            Some(other) => {
                warn!("unknown export format `{}`, falling back to json", other);
                ExportFormat::Json
            }
        }
    }

}

fn money(amount: &BigDecimal) -> f64{
    amount.to_f64().unwrap_or_default()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsData{
    pub total_withdrawals: i64,
    pub pending_count: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
    pub total_amount: f64,
    pub approved_amount: f64,
    pub avg_amount: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MonthlyData{
    pub month: String,
    pub count: i64,
    pub total: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MethodData{
    pub method: String,
    pub count: i64,
    pub total: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopUserData{
    pub name: String,
    pub email: String,
    pub withdrawal_count: i64,
    pub total_amount: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse{
    pub stats: StatsData,
    pub monthly: Vec<MonthlyData>,
    pub by_method: Vec<MethodData>,
    pub top_users: Vec<TopUserData>,
}

impl From<&StatisticsReport> for AnalyticsResponse{
    fn from(report: &StatisticsReport) -> Self{
        let s = &report.summary;
        AnalyticsResponse{
            stats: StatsData{
                total_withdrawals: s.total_withdrawals,
                pending_count: s.pending_count,
                approved_count: s.approved_count,
                rejected_count: s.rejected_count,
                total_amount: money(&s.total_amount),
                approved_amount: money(&s.approved_amount),
                avg_amount: money(&s.avg_amount),
            },
            monthly: report.monthly
                .iter()
                .map(|b| MonthlyData{ month: b.month.clone(), count: b.count, total: money(&b.total) })
                .collect(),
            by_method: report.by_method
                .iter()
                .map(|m| MethodData{ method: m.method.clone(), count: m.count, total: money(&m.total) })
                .collect(),
            top_users: report.top_users
                .iter()
                .map(|u| TopUserData{
                    name: u.name.clone(),
                    email: u.email.clone(),
                    withdrawal_count: u.withdrawal_count,
                    total_amount: money(&u.total_amount),
                })
                .collect(),
        }
    }
}


/* ------------------------------ sheet model ------------------------------ */

#[derive(Clone, Debug, PartialEq)]
pub enum Cell{
    Text(String),
    Number(f64),
}

impl From<&str> for Cell{
    fn from(s: &str) -> Self{
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell{
    fn from(n: f64) -> Self{
        Cell::Number(n)
    }
}

impl From<i64> for Cell{
    fn from(n: i64) -> Self{
        Cell::Number(n as f64)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sheet{
    pub name: String,
    pub rows: Vec<Vec<Cell>>, // first row is the header
}

impl Sheet{

    fn new(name: &str, header: &[&str]) -> Self{
        Sheet{ name: name.to_string(), rows: vec![header.iter().map(|h| Cell::from(*h)).collect()] }
    }

    fn row(mut self, cells: Vec<Cell>) -> Self{
        self.rows.push(cells);
        self
    }

}

pub fn sheets(data: &AnalyticsResponse) -> Vec<Sheet>{

    let stats = &data.stats;
    let statistics = Sheet::new("Statistics", &["Metric", "Value"])
        .row(vec!["Total withdrawals".into(), stats.total_withdrawals.into()])
        .row(vec!["Pending".into(), stats.pending_count.into()])
        .row(vec!["Approved".into(), stats.approved_count.into()])
        .row(vec!["Rejected".into(), stats.rejected_count.into()])
        .row(vec!["Total amount".into(), stats.total_amount.into()]);

    let by_month = data.monthly
        .iter()
        .fold(Sheet::new("By month", &["Month", "Count", "Total"]), |sheet, m| {
            sheet.row(vec![m.month.as_str().into(), m.count.into(), m.total.into()])
        });

    let top_users = data.top_users
        .iter()
        .fold(Sheet::new("Top users", &["Name", "Email", "Withdrawals", "Total"]), |sheet, u| {
            sheet.row(vec![u.name.as_str().into(), u.email.as_str().into(), u.withdrawal_count.into(), u.total_amount.into()])
        });

    vec![statistics, by_month, top_users]
}


/* ---------------------------- workbook writers ---------------------------- */

pub trait WorkbookWriter: Send + Sync{

    fn write(&self, sheets: &[Sheet]) -> Result<Vec<u8>, ExportError>;

}

#[cfg(feature = "xlsx")]
pub struct XlsxWorkbookWriter;

#[cfg(feature = "xlsx")]
impl WorkbookWriter for XlsxWorkbookWriter{

    fn write(&self, sheets: &[Sheet]) -> Result<Vec<u8>, ExportError>{

        use rust_xlsxwriter::Workbook;
        let writer_err = |e: rust_xlsxwriter::XlsxError| ExportError::Writer(e.to_string());

        let mut workbook = Workbook::new();
        for sheet in sheets{
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name).map_err(writer_err)?;
            for (r, cells) in sheet.rows.iter().enumerate(){
                for (c, cell) in cells.iter().enumerate(){
                    let (row, col) = (r as u32, c as u16);
                    match cell{
                        Cell::Text(s) => worksheet.write_string(row, col, s.as_str()).map_err(writer_err)?,
                        Cell::Number(n) => worksheet.write_number(row, col, *n).map_err(writer_err)?,
                    };
                }
            }
        }

        workbook.save_to_buffer().map_err(writer_err)
    }

}

/* the writer the binary ships with, none when built without the xlsx feature */
#[cfg(feature = "xlsx")]
pub fn default_writer() -> Option<Arc<dyn WorkbookWriter>>{
    Some(Arc::new(XlsxWorkbookWriter))
}

#[cfg(not(feature = "xlsx"))]
pub fn default_writer() -> Option<Arc<dyn WorkbookWriter>>{
    None
}


/* ------------------------------- rendering ------------------------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct Rendered{
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub is_binary: bool,
}

pub fn render(report: &StatisticsReport, format: ExportFormat, writer: Option<&dyn WorkbookWriter>) -> Result<Rendered, ExportError>{

    let data = AnalyticsResponse::from(report);
    match format{
        ExportFormat::Json => {
            let bytes = serde_json::to_vec(&data).map_err(|e| ExportError::Writer(e.to_string()))?;
            Ok(Rendered{ bytes, content_type: JSON_CONTENT_TYPE, is_binary: false })
        },
        ExportFormat::Excel => {
            let Some(writer) = writer else{
                return Err(ExportError::Unavailable);
            };
            let bytes = writer.write(&sheets(&data))?;
            Ok(Rendered{ bytes, content_type: XLSX_CONTENT_TYPE, is_binary: true })
        }
    }
}

pub fn export_filename(now: DateTime<Utc>) -> String{
    format!("analytics_{}.xlsx", now.format("%Y%m%d"))
}
