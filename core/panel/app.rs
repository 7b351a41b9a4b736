


/*

    ---------------------------------------------------------------
    |                    BACKOFFICE PANEL SERVER
    ---------------------------------------------------------------

        cargo run --bin panel                          ---> run the http server
        cargo run --bin panel -- hash-password <pswd>  ---> print the argon2 hash of a password to seed admin_users

    env vars are loaded from .env, see .env.example, DATABASE_URL may be
    left out in which case every data route answers with a db config error

*/


use std::sync::Arc;
use dotenv::dotenv;
use env_logger::Env as LogEnv;
use log::{error, info};
use crate::apis::Panel;
use crate::config::{EnvExt, ProcessEnv};
use crate::models::admin_users::AdminUser;
use crate::storage::ConnectionSource;
use crate::storage::pg::PgSource;
use storereq::Storage;

mod apis;
mod config;
mod constants;
mod engine;
mod envelope;
mod error;
mod models;
mod passport;
mod report;
mod schema;
mod server;
mod storage;


#[actix_web::main]
async fn main() -> std::io::Result<()>{

    dotenv().ok();
    env_logger::init_from_env(LogEnv::default().default_filter_or("info"));

    let args = std::env::args().collect::<Vec<_>>();
    if args.get(1).map(String::as_str) == Some("hash-password"){
        let Some(password) = args.get(2) else{
            error!("usage: panel hash-password <password>");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing password"));
        };
        let hash = AdminUser::hash_pswd(password)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        println!("{}", hash);
        return Ok(());
    }

    /* read once, passed down into the panel */
    let vars = match ProcessEnv.get_vars(){
        Ok(ctx) => ctx.vars,
        Err(e) => {
            error!("😕 invalid panel configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    let source: Option<Arc<dyn ConnectionSource>> = match vars.database_url(){
        Ok(url) => {
            let storage = Storage::connect(url, vars.DB_POOL_SIZE);
            Some(Arc::new(PgSource::new(storage)))
        },
        Err(e) => {
            error!("🛢️ {}, every data route will answer with a db config error", e);
            None
        }
    };

    let host = vars.HOST.clone();
    let port = vars.PANEL_PORT;
    let panel = Panel::new(vars, source, report::default_writer());
    info!("🔑 issuing tokens valid for {} hours", panel.token_ttl().num_hours());

    server!(host, port, panel)
}
