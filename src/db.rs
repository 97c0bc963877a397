use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Object, Pool, PoolConfig, RecyclingMethod, Runtime, SslMode};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use postgres_types::ToSql;
use tokio::task::JoinHandle;
use tokio_postgres::Row;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::models::{RegisterUserRequest, Reservation, ReservationFields, User};
use crate::store::{ReservationStore, StoreError};

const USER_COLUMNS: &str = "id, name, email";

const RESERVATION_COLUMNS: &str =
    "id, date, number_of_guest, full_name, email, phone_number, description, user_id, title";

/// Handle on the PostgreSQL connection pool.
///
/// Built once in `main` and shared with the router; every store operation
/// borrows one connection, runs one statement and hands the connection back
/// when the pooled `Object` drops.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Build the pool. No connection is opened until the first query.
    pub fn new(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = Self::create_pool(config)?;
        Ok(Database { pool })
    }

    fn create_pool(config: &DatabaseConfig) -> Result<Pool, StoreError> {
        let mut pg_config = Config::new();
        pg_config.url = Some(config.url.clone());

        // Always encrypted, whatever the connection string says
        pg_config.ssl_mode = Some(SslMode::Require);

        pg_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(config.max_connections);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pool_config.timeouts.create = Some(config.connection_timeout);
        pool_config.timeouts.recycle = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            StoreError::Unavailable(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config
            .create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                StoreError::Unavailable(format!("Connection pool creation failed: {}", e))
            })
    }

    async fn get_connection(&self) -> Result<Object, StoreError> {
        self.pool.get().await.map_err(StoreError::from)
    }

    /// `SELECT version()`, logged once at startup.
    pub async fn server_version(&self) -> Result<String, StoreError> {
        let client = self.get_connection().await?;
        let row = client.query_one("SELECT version()", &[]).await?;
        Ok(row.get(0))
    }

    /// Best-effort startup diagnostic. Failures are logged and swallowed.
    pub async fn log_server_version(&self) {
        match self.server_version().await {
            Ok(version) => info!("Connected to {}", version),
            Err(e) => error!("Database version check failed: {}", e),
        }
    }

    /// Run [`Database::log_server_version`] in the background.
    pub fn spawn_version_check(&self) -> JoinHandle<()> {
        let database = self.clone();
        tokio::spawn(async move { database.log_server_version().await })
    }

    /// Stop handing out connections and drop the idle ones.
    pub fn close(&self) {
        self.pool.close();
        info!("Database connection pool closed");
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
    }
}

fn reservation_from_row(row: &Row) -> Reservation {
    Reservation {
        id: row.get("id"),
        date: row.get("date"),
        number_of_guest: row.get("number_of_guest"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone_number: row.get("phone_number"),
        description: row.get("description"),
        user_id: row.get("user_id"),
        title: row.get("title"),
    }
}

#[async_trait]
impl ReservationStore for Database {
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = client.query_opt(&query, &[&id]).await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn register_user(
        &self,
        request: &RegisterUserRequest,
    ) -> Result<Option<User>, StoreError> {
        let client = self.get_connection().await?;

        // An existing id makes ON CONFLICT skip the insert, so no row comes back
        let query = format!(
            "INSERT INTO users (id, name, email) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO NOTHING RETURNING {USER_COLUMNS}"
        );

        let row = client
            .query_opt(&query, &[&request.id, &request.name, &request.email])
            .await?;

        let user = row.as_ref().map(user_from_row);
        if let Some(ref user) = user {
            info!("Registered user with id: {}", user.id);
        }
        Ok(user)
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {RESERVATION_COLUMNS} FROM bookings ORDER BY id DESC");

        let rows = client.query(&query, &[]).await?;
        Ok(rows.iter().map(reservation_from_row).collect())
    }

    async fn list_reservations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Reservation>, StoreError> {
        let client = self.get_connection().await?;
        let query = format!(
            "SELECT {RESERVATION_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY id DESC"
        );

        let rows = client.query(&query, &[&user_id]).await?;
        Ok(rows.iter().map(reservation_from_row).collect())
    }

    async fn create_reservation(
        &self,
        fields: &ReservationFields,
    ) -> Result<Reservation, StoreError> {
        let client = self.get_connection().await?;
        let query = format!(
            "INSERT INTO bookings \
             (date, number_of_guest, full_name, email, phone_number, description, user_id, title) \
             VALUES ($1::text::date, $2::text::integer, $3, $4, $5, $6, $7, $8) \
             RETURNING {RESERVATION_COLUMNS}"
        );

        let params: [&(dyn ToSql + Sync); 8] = [
            &fields.date,
            &fields.number_of_guest,
            &fields.full_name,
            &fields.email,
            &fields.phone_number,
            &fields.description,
            &fields.user_id,
            &fields.title,
        ];

        let row = client.query_one(&query, &params).await?;
        let reservation = reservation_from_row(&row);

        info!("Created reservation with id: {}", reservation.id);
        Ok(reservation)
    }

    async fn update_reservation(
        &self,
        id: &str,
        fields: &ReservationFields,
    ) -> Result<Option<Reservation>, StoreError> {
        let client = self.get_connection().await?;

        // user_id is not part of the SET list
        let query = format!(
            "UPDATE bookings SET date = $1::text::date, number_of_guest = $2::text::integer, \
             full_name = $3, email = $4, phone_number = $5, description = $6, title = $7 \
             WHERE id = $8::text::integer RETURNING {RESERVATION_COLUMNS}"
        );

        let params: [&(dyn ToSql + Sync); 8] = [
            &fields.date,
            &fields.number_of_guest,
            &fields.full_name,
            &fields.email,
            &fields.phone_number,
            &fields.description,
            &fields.title,
            &id,
        ];

        let row = client.query_opt(&query, &params).await?;
        Ok(row.as_ref().map(reservation_from_row))
    }

    async fn delete_reservation(&self, id: i32) -> Result<Option<Reservation>, StoreError> {
        let client = self.get_connection().await?;
        let query = format!("DELETE FROM bookings WHERE id = $1 RETURNING {RESERVATION_COLUMNS}");

        let row = client.query_opt(&query, &[&id]).await?;
        Ok(row.as_ref().map(reservation_from_row))
    }
}
