


use diesel::r2d2::{ConnectionManager, Pool, PooledConnection, PoolError};
use diesel::PgConnection;
use log::info;
use uuid::Uuid;


pub type PgPool = Pool<ConnectionManager<PgConnection>>;
pub type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;


/*  ----------------------
   | shared state storage
   |----------------------
   | diesel postgres pool, built once at startup and
   | handed to every request which checks a connection
   | out of it and gives it back on drop
   |
*/


#[derive(Clone, Debug, PartialEq)]
pub enum Mode{
    On,
    Off,
}

#[derive(Clone)] // Pool is an Arc internally so cloning the db shares the same connections
pub struct Db{
    pub mode: Mode,
    pub url: Option<String>,
    pub pool: Option<PgPool>,
}

impl Default for Db{
    fn default() -> Db {
        Db{
            mode: self::Mode::Off,
            url: None,
            pool: None,
        }
    }
}

impl Db{

    /*
        the pool is built unchecked so a database that is down at
        startup doesn't kill the server, each checkout will fail
        instead and the request answers with a 500
    */
    pub fn new(url: &str, max_size: u32) -> Db{
        let manager = ConnectionManager::<PgConnection>::new(url);
        let pool = Pool::builder()
            .max_size(max_size)
            .test_on_check_out(true)
            .build_unchecked(manager);

        Db{
            mode: Mode::On,
            url: Some(url.to_string()),
            pool: Some(pool),
        }
    }

    pub fn detach(&mut self){
        self.mode = Mode::Off;
    }

}

#[derive(Clone, Default)]
pub struct Storage{
    pub id: Uuid,
    pub db: Option<Db>, // we could have no db at all
}

impl Storage{

    pub fn connect(url: &str, max_size: u32) -> Storage{
        let id = Uuid::new_v4();
        info!("🛢️ building postgres pool with {} connections for storage {}", max_size, id);
        Storage{
            id,
            db: Some(Db::new(url, max_size)),
        }
    }

    /* returns the pool only if the db is attached */
    pub fn get_pgdb(&self) -> Option<&PgPool>{
        match self.db.as_ref(){
            Some(db) if db.mode == Mode::On => db.pool.as_ref(),
            _ => None, // no storage is available cause it's off
        }
    }

    /*
        checking out a connection, the returned PooledConnection
        goes back to the pool once it gets dropped no matter on
        what path the caller leaves its scope
    */
    pub fn checkout(&self) -> Option<Result<PgPooledConnection, PoolError>>{
        self.get_pgdb().map(|pool| pool.get())
    }

}
