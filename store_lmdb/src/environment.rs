//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbLedgerStore, LmdbMetaStore, Migrator};

/// Number of named databases the ledger uses.
const MAX_DBS: u32 = 3;

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    meta_db: Database<Bytes, Bytes>,
    balances_db: Database<Bytes, Bytes>,
    locks_db: Database<Bytes, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory, create the
    /// ledger databases and bring the schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size).max_dbs(MAX_DBS);
        // SAFETY: the environment is opened once per directory by this process
        // and the files are not modified by anything outside LMDB.
        let env = unsafe { options.open(path) }?;

        let mut wtxn = env.write_txn()?;
        let meta_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("meta"))?;
        let balances_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("balances"))?;
        let locks_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("locks"))?;
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            meta_db,
            balances_db,
            locks_db,
            path: path.to_path_buf(),
        };
        Migrator::run(&environment.meta_store())?;

        tracing::info!(path = %path.display(), map_size, "LMDB environment opened");
        Ok(environment)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ledger_store(&self) -> LmdbLedgerStore {
        LmdbLedgerStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
            balances_db: self.balances_db,
            locks_db: self.locks_db,
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
        }
    }
}
