// src/common/test_db.rs

// Banco descartável para os testes de repositório. Cada chamada cria um
// database novo no Postgres de DATABASE_URL e roda as migrações nele.
// Sem DATABASE_URL (ou sem servidor) os testes que dependem dele são pulados.

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection, Executor, PgConnection, PgPool,
};
use uuid::Uuid;

pub struct TestDb {
    pub pool: PgPool,
    admin: PgConnectOptions,
    name: String,
}

impl TestDb {
    pub async fn fresh() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL ausente: teste com banco pulado");
            return None;
        };
        let admin: PgConnectOptions = url.parse().expect("DATABASE_URL inválida");

        let mut conn = match PgConnection::connect_with(&admin).await {
            Ok(conn) => conn,
            Err(e) => {
                eprintln!("Postgres indisponível ({e}): teste com banco pulado");
                return None;
            }
        };

        let name = format!("ezer_test_{}", Uuid::new_v4().simple());
        conn.execute(format!("CREATE DATABASE {name}").as_str())
            .await
            .expect("falha ao criar o banco de teste");
        conn.close().await.ok();

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(admin.clone().database(&name))
            .await
            .expect("falha ao conectar no banco de teste");
        sqlx::migrate!().run(&pool).await.expect("falha nas migrações");

        Some(Self { pool, admin, name })
    }

    pub async fn drop_database(self) {
        self.pool.close().await;
        if let Ok(mut conn) = PgConnection::connect_with(&self.admin).await {
            let sql = format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.name);
            conn.execute(sql.as_str()).await.ok();
        }
    }
}
