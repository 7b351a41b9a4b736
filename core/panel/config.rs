


/*
    all the env vars are read once in main() and the built Env is
    passed down into the Panel, nothing reads the process env per
    request, a missing DATABASE_URL is not fatal here since the
    routes answer with a db config error instead
*/


use log::warn;
use crate::constants::*;
use crate::error::ConfigError;


#[allow(non_snake_case)]
#[derive(Clone, Debug, Default)]
pub struct Env{
    pub DATABASE_URL: Option<String>,
    pub JWT_SECRET: Option<String>,
    pub HOST: String,
    pub PANEL_PORT: u16,
    pub TOKEN_TTL_HOURS: i64,
    pub DB_POOL_SIZE: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Context<C>{
    pub vars: C
}

pub trait EnvExt{

    type Context;
    fn get_vars(&self) -> Result<Self::Context, ConfigError>;
}

/* reads the process env, dotenv must have been loaded before */
pub struct ProcessEnv;

impl EnvExt for ProcessEnv{

    type Context = Context<Env>;

    fn get_vars(&self) -> Result<Self::Context, ConfigError>{
        Env::from_lookup(|key| std::env::var(key).ok())
    }
}

impl Env{

    pub fn from_lookup<F>(lookup: F) -> Result<Context<Env>, ConfigError>
        where F: Fn(&str) -> Option<String>
    {

        /* empty values are treated the same as unset ones */
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        fn parse<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>{
            match raw{
                Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue{ key, value }),
                None => Ok(default),
            }
        }

        let ttl = parse("TOKEN_TTL_HOURS", get("TOKEN_TTL_HOURS"), DEFAULT_TOKEN_TTL_HOURS)?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&ttl){
            return Err(ConfigError::InvalidValue{ key: "TOKEN_TTL_HOURS", value: ttl.to_string() });
        }

        Ok(
            Context{
                vars: Env{
                    DATABASE_URL: get("DATABASE_URL"),
                    JWT_SECRET: get("JWT_SECRET"),
                    HOST: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                    PANEL_PORT: parse("PANEL_PORT", get("PANEL_PORT"), DEFAULT_PANEL_PORT)?,
                    TOKEN_TTL_HOURS: ttl,
                    DB_POOL_SIZE: parse("DB_POOL_SIZE", get("DB_POOL_SIZE"), DEFAULT_DB_POOL_SIZE)?,
                }
            }
        )
    }

    /*
        the fallback secret is a known weakness, anyone who reads the
        source can forge tokens, so we shout about it on every boot
    */
    pub fn jwt_secret(&self) -> String{
        match self.JWT_SECRET.as_ref(){
            Some(secret) => secret.clone(),
            None => {
                warn!("⚠️ JWT_SECRET is not set, signing tokens with the built-in fallback secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        }
    }

    pub fn database_url(&self) -> Result<&str, ConfigError>{
        self.DATABASE_URL.as_deref().ok_or(ConfigError::MissingDatabaseUrl)
    }

}


#[cfg(test)]
mod tests{

    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> Result<Context<Env>, ConfigError>{
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Env::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set(){
        let env = env_of(&[]).unwrap().vars;
        assert_eq!(env.HOST, DEFAULT_HOST);
        assert_eq!(env.PANEL_PORT, DEFAULT_PANEL_PORT);
        assert_eq!(env.TOKEN_TTL_HOURS, 24);
        assert_eq!(env.DB_POOL_SIZE, DEFAULT_DB_POOL_SIZE);
        assert_eq!(env.database_url(), Err(ConfigError::MissingDatabaseUrl));
        assert_eq!(env.jwt_secret(), DEFAULT_JWT_SECRET);
    }

    #[test]
    fn blank_values_count_as_unset(){
        let env = env_of(&[("DATABASE_URL", "  "), ("JWT_SECRET", "")]).unwrap().vars;
        assert!(env.DATABASE_URL.is_none());
        assert!(env.JWT_SECRET.is_none());
    }

    #[test]
    fn configured_values_win(){
        let env = env_of(&[
            ("DATABASE_URL", "postgres://u:p@db/backoffice"),
            ("JWT_SECRET", "s3cr3t"),
            ("PANEL_PORT", "9000"),
            ("TOKEN_TTL_HOURS", "2"),
        ]).unwrap().vars;
        assert_eq!(env.database_url(), Ok("postgres://u:p@db/backoffice"));
        assert_eq!(env.jwt_secret(), "s3cr3t");
        assert_eq!(env.PANEL_PORT, 9000);
        assert_eq!(env.TOKEN_TTL_HOURS, 2);
    }

    #[test]
    fn bad_numbers_are_rejected(){
        let err = env_of(&[("PANEL_PORT", "seventy")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue{ key: "PANEL_PORT", value: "seventy".to_string() });
        assert!(env_of(&[("TOKEN_TTL_HOURS", "0")]).is_err());
        let err = env_of(&[("TOKEN_TTL_HOURS", "10000000000")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue{ key: "TOKEN_TTL_HOURS", value: "10000000000".to_string() });
        assert_eq!(env_of(&[("TOKEN_TTL_HOURS", "8760")]).unwrap().vars.TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS);
    }

}
