use deadpool_postgres::{Object, Pool};

/// Cheap-to-clone handle on the store pool, injected into every DAO.
#[derive(Debug, Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub async fn get_client(
        &self,
    ) -> Result<Object, deadpool_postgres::PoolError> {
        self.pool.get().await
    }

    pub fn pool(&self) -> &Pool { &self.pool }

    /// `(available, size, max_size)` of the pool.
    pub fn get_pool_status(&self) -> (usize, usize, usize) {
        let status = self.pool.status();
        (status.available, status.size, status.max_size)
    }
}
