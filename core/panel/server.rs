


/*
    the actix transport below the envelope, every incoming request is
    handed to the default service which turns it into a PanelRequest,
    runs the router on the blocking pool since diesel is synchronous
    and writes the envelope back as a real http response
*/


use std::collections::HashMap;
use actix_web::{web, HttpRequest, HttpResponse};
use actix_web::http::StatusCode;
use log::error;
use crate::apis::{HttpMethod, Panel, PanelRequest};
use crate::constants::*;
use crate::envelope::ResponseEnvelope;


#[macro_export]
macro_rules! server {
    (
        $host:expr,
        $port:expr,
        $panel:expr
    ) => {

        {
            use actix_web::{web, App, HttpServer};
            use actix_web::middleware::Logger;
            use log::info;
            use $crate::constants::*;

            let host = $host;
            let port = $port;

            /*
                the panel is built once and shared between the workers,
                each worker gets its own App with a clone of the Data
            */
            let shared_panel = web::Data::new($panel);

            info!("➔ 🚀 {} panel HTTP server has launched from [{}:{}] at {}", APP_NAME, host, port, chrono::Local::now().naive_local());
            HttpServer::new(move ||{
                App::new()
                    .app_data(web::Data::clone(&shared_panel))
                    .wrap(Logger::new("%a %{User-Agent}i %t %r %s %b %T"))
                    .default_service(web::to($crate::server::serve))
            })
            .bind((host.as_str(), port))?
            .run()
            .await
        }
    };
}

pub fn panel_request(req: &HttpRequest, body: &web::Bytes) -> PanelRequest{

    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map(|q| q.into_inner())
        .unwrap_or_default();

    /* non ascii header values can't be tokens or content types anyway */
    let headers = req.headers()
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();

    PanelRequest{
        method: HttpMethod::from(req.method().as_str()),
        path: req.path().to_string(),
        headers,
        query,
        body: if body.is_empty(){ None } else{ Some(String::from_utf8_lossy(body).into_owned()) },
    }
}

pub fn into_http(envelope: &ResponseEnvelope) -> HttpResponse{

    let status = StatusCode::from_u16(envelope.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = match envelope.body_bytes(){
        Ok(bytes) => bytes,
        Err(e) => {
            error!("can't decode the binary body of the envelope due to: {}", e);
            return HttpResponse::InternalServerError()
                .insert_header((ALLOW_ORIGIN, "*"))
                .content_type(JSON_CONTENT_TYPE)
                .body(serde_json::json!({ "error": INTERNAL_SERVER_ERROR }).to_string());
        }
    };

    let mut builder = HttpResponse::build(status);
    for (k, v) in envelope.headers().iter(){
        builder.insert_header((k, v));
    }
    builder.body(bytes)
}

pub async fn serve(req: HttpRequest, body: web::Bytes, panel: web::Data<Panel>) -> HttpResponse{

    let panel_req = panel_request(&req, &body);
    let panel = panel.into_inner();

    match web::block(move || panel.dispatch(&panel_req)).await{
        Ok(envelope) => into_http(&envelope),
        Err(e) => {
            error!("blocking dispatch got canceled due to: {}", e);
            into_http(&ResponseEnvelope::error(500, INTERNAL_SERVER_ERROR))
        }
    }
}
