


use chrono::Utc;
use crate::constants::*;
use crate::engine::AggregationEngine;
use crate::envelope::{Headers, ResponseEnvelope};
use crate::error::{ErrorKind, PanelError};
use crate::report::{export_filename, render, ExportFormat};
use super::{method_not_allowed, HttpMethod, Panel, PanelRequest, PanelResult};


pub fn handle(panel: &Panel, req: &PanelRequest) -> PanelResult{

    panel.authorize(req, "analytics")?;
    panel.require_database("analytics")?;

    match req.method{
        HttpMethod::Get => get_analytics(panel, req),
        _ => Err(method_not_allowed(req, "analytics")),
    }
}

/*
    GET /analytics?format=json|excel

    the report is rebuilt from the current rows on every call, the
    connection goes back to the pool before the workbook gets written
*/
pub fn get_analytics(panel: &Panel, req: &PanelRequest) -> PanelResult{

    let format = ExportFormat::parse(req.query_param("format"));
    let now = Utc::now();

    let report = {
        let mut repo = panel.repository("get_analytics")?;
        AggregationEngine::new(repo.as_mut())
            .compute_report(now)
            .map_err(|e| PanelError::new(e, "get_analytics"))?
    };

    let rendered = render(&report, format, panel.workbook())
        .map_err(|e| PanelError::new(e, "get_analytics"))?;

    if !rendered.is_binary{
        let body = String::from_utf8(rendered.bytes)
            .map_err(|e| PanelError::new(ErrorKind::Internal(e.to_string()), "get_analytics"))?;
        return Ok(ResponseEnvelope::text(200, body, rendered.content_type));
    }

    let disposition = format!("attachment; filename=\"{}\"", export_filename(now));
    Ok(
        ResponseEnvelope::binary(
            200,
            &rendered.bytes,
            rendered.content_type,
            Headers::default().with(CONTENT_DISPOSITION, &disposition),
        )
    )
}
