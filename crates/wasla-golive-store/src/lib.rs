// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! SQLite tenant store backing the go-live checker.
//!
//! The schema is versioned with `PRAGMA user_version`; the store reports
//! itself ready only once every migration has been applied. Snapshots load
//! each section independently so one unreadable table does not hide the
//! rest of the tenant state.

mod errors;
mod fixture;
mod schema;

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::{info, warn};
use wasla_golive_core::{StoreError, TenantStateSource};
use wasla_golive_model::{
    Branding, CustomDomain, LegalPage, LegalPageKind, PaymentMethod, ProductSummary, Section,
    ShippingZone, StoreProfile, TenantId, TenantSnapshot,
};

pub use errors::map_sqlite_error;
pub use fixture::{FixtureError, TenantFixture};
pub use schema::SCHEMA_VERSION;

pub const CRATE_NAME: &str = "wasla-golive-store";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug)]
pub struct SqliteTenantStore {
    conn: Connection,
}

impl SqliteTenantStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|err| StoreError::Unavailable {
            detail: format!("open {} failed: {err}", path.display()),
        })?;
        Self::configure(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(map_sqlite_error)?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
            .map_err(map_sqlite_error)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(map_sqlite_error)?;
        Ok(Self { conn })
    }

    /// Applies pending migrations and returns the `(from, to)` versions.
    pub fn migrate(&mut self) -> Result<(i64, i64), StoreError> {
        schema::migrate(&mut self.conn)
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        schema::schema_version(&self.conn)
    }

    /// Replaces everything stored for the fixture's tenant.
    pub fn import_tenant(&mut self, fixture: &TenantFixture) -> Result<TenantId, FixtureError> {
        let tenant = fixture.tenant_id()?;
        self.ensure_ready()?;
        let tx = self.conn.transaction().map_err(map_sqlite_error)?;
        tx.execute(
            "DELETE FROM tenants WHERE tenant_id = ?1",
            params![tenant.as_str()],
        )
        .map_err(map_sqlite_error)?;
        write_profile(&tx, &tenant, &fixture.profile)?;
        write_branding(&tx, &tenant, &fixture.branding)?;
        for method in &fixture.payments {
            write_payment_method(&tx, &tenant, method)?;
        }
        for product in &fixture.catalog {
            write_product(&tx, &tenant, product)?;
        }
        for zone in &fixture.shipping {
            write_shipping_zone(&tx, &tenant, zone)?;
        }
        for page in &fixture.legal {
            write_legal_page(&tx, &tenant, page)?;
        }
        for domain in &fixture.domains {
            write_domain(&tx, &tenant, domain)?;
        }
        tx.commit().map_err(map_sqlite_error)?;
        info!(
            tenant = %tenant,
            products = fixture.catalog.len(),
            "tenant_imported"
        );
        Ok(tenant)
    }

    pub fn upsert_profile(
        &mut self,
        tenant: &TenantId,
        profile: &StoreProfile,
    ) -> Result<(), StoreError> {
        self.write(|tx| write_profile(tx, tenant, profile))
    }

    pub fn upsert_branding(
        &mut self,
        tenant: &TenantId,
        branding: &Branding,
    ) -> Result<(), StoreError> {
        self.write(|tx| write_branding(tx, tenant, branding))
    }

    pub fn upsert_payment_method(
        &mut self,
        tenant: &TenantId,
        method: &PaymentMethod,
    ) -> Result<(), StoreError> {
        self.write(|tx| write_payment_method(tx, tenant, method))
    }

    pub fn upsert_product(
        &mut self,
        tenant: &TenantId,
        product: &ProductSummary,
    ) -> Result<(), StoreError> {
        self.write(|tx| write_product(tx, tenant, product))
    }

    pub fn upsert_shipping_zone(
        &mut self,
        tenant: &TenantId,
        zone: &ShippingZone,
    ) -> Result<(), StoreError> {
        self.write(|tx| write_shipping_zone(tx, tenant, zone))
    }

    pub fn upsert_legal_page(
        &mut self,
        tenant: &TenantId,
        page: &LegalPage,
    ) -> Result<(), StoreError> {
        self.write(|tx| write_legal_page(tx, tenant, page))
    }

    pub fn upsert_domain(
        &mut self,
        tenant: &TenantId,
        domain: &CustomDomain,
    ) -> Result<(), StoreError> {
        self.write(|tx| write_domain(tx, tenant, domain))
    }

    fn write(
        &mut self,
        op: impl FnOnce(&Transaction<'_>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        self.ensure_ready()?;
        let tx = self.conn.transaction().map_err(map_sqlite_error)?;
        op(&tx)?;
        tx.commit().map_err(map_sqlite_error)
    }

    fn tenant_exists(&self, tenant: &TenantId) -> Result<bool, StoreError> {
        self.conn
            .query_row(
                "SELECT 1 FROM tenants WHERE tenant_id = ?1",
                params![tenant.as_str()],
                |_| Ok(()),
            )
            .optional()
            .map(|row| row.is_some())
            .map_err(map_sqlite_error)
    }

    fn section<T>(
        &self,
        tenant: &TenantId,
        name: &str,
        loaded: Result<T, StoreError>,
    ) -> Section<T> {
        match loaded {
            Ok(value) => Section::Loaded(value),
            Err(err) => {
                warn!(
                    tenant = %tenant,
                    section = name,
                    error_code = err.category(),
                    detail = %err,
                    "tenant_section_unavailable"
                );
                Section::unavailable(err.category(), err.to_string())
            }
        }
    }
}

impl TenantStateSource for SqliteTenantStore {
    fn ensure_ready(&self) -> Result<(), StoreError> {
        schema::ensure_current(&self.conn)
    }

    fn list_tenants(&self) -> Result<Vec<TenantId>, StoreError> {
        self.ensure_ready()?;
        let mut stmt = self
            .conn
            .prepare("SELECT tenant_id FROM tenants ORDER BY tenant_id")
            .map_err(map_sqlite_error)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(map_sqlite_error)?;
        let mut out = Vec::new();
        for row in rows {
            let raw = row.map_err(map_sqlite_error)?;
            let tenant = TenantId::parse(&raw).map_err(|err| StoreError::Query {
                detail: format!("stored tenant id: {err}"),
            })?;
            out.push(tenant);
        }
        Ok(out)
    }

    fn snapshot(&self, tenant: &TenantId) -> Result<TenantSnapshot, StoreError> {
        self.ensure_ready()?;
        if !self.tenant_exists(tenant)? {
            return Err(StoreError::UnknownTenant {
                tenant: tenant.clone(),
            });
        }
        Ok(TenantSnapshot {
            tenant: tenant.clone(),
            profile: self.section(tenant, "profile", read_profile(&self.conn, tenant)),
            branding: self.section(tenant, "branding", read_branding(&self.conn, tenant)),
            payments: self.section(tenant, "payments", read_payments(&self.conn, tenant)),
            catalog: self.section(tenant, "catalog", read_catalog(&self.conn, tenant)),
            shipping: self.section(tenant, "shipping", read_shipping(&self.conn, tenant)),
            legal: self.section(tenant, "legal", read_legal(&self.conn, tenant)),
            domains: self.section(tenant, "domains", read_domains(&self.conn, tenant)),
        })
    }
}

fn write_profile(
    tx: &Transaction<'_>,
    tenant: &TenantId,
    profile: &StoreProfile,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO tenants (tenant_id, name, contact_email, description, currency, logo_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (tenant_id) DO UPDATE SET
           name = excluded.name,
           contact_email = excluded.contact_email,
           description = excluded.description,
           currency = excluded.currency,
           logo_url = excluded.logo_url",
        params![
            tenant.as_str(),
            profile.name,
            profile.contact_email,
            profile.description,
            profile.currency,
            profile.logo_url
        ],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

fn write_branding(
    tx: &Transaction<'_>,
    tenant: &TenantId,
    branding: &Branding,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR REPLACE INTO branding
           (tenant_id, theme_code, primary_color, secondary_color, accent_color, font_family)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tenant.as_str(),
            branding.theme_code,
            branding.primary_color,
            branding.secondary_color,
            branding.accent_color,
            branding.font_family
        ],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

fn write_payment_method(
    tx: &Transaction<'_>,
    tenant: &TenantId,
    method: &PaymentMethod,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR REPLACE INTO payment_methods (tenant_id, provider, enabled) VALUES (?1, ?2, ?3)",
        params![tenant.as_str(), method.provider, method.enabled],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

fn write_product(
    tx: &Transaction<'_>,
    tenant: &TenantId,
    product: &ProductSummary,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR REPLACE INTO products (tenant_id, sku, name, price_minor, published, image_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tenant.as_str(),
            product.sku,
            product.name,
            product.price_minor,
            product.published,
            product.image_count
        ],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

fn write_shipping_zone(
    tx: &Transaction<'_>,
    tenant: &TenantId,
    zone: &ShippingZone,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR REPLACE INTO shipping_zones (tenant_id, name, enabled) VALUES (?1, ?2, ?3)",
        params![tenant.as_str(), zone.name, zone.enabled],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

fn write_legal_page(
    tx: &Transaction<'_>,
    tenant: &TenantId,
    page: &LegalPage,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR REPLACE INTO legal_pages (tenant_id, kind, published) VALUES (?1, ?2, ?3)",
        params![tenant.as_str(), page.kind.as_str(), page.published],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

fn write_domain(
    tx: &Transaction<'_>,
    tenant: &TenantId,
    domain: &CustomDomain,
) -> Result<(), StoreError> {
    let hostname = domain.hostname.trim().to_ascii_lowercase();
    let owner: Option<String> = tx
        .query_row(
            "SELECT tenant_id FROM custom_domains WHERE hostname = ?1",
            params![hostname],
            |row| row.get(0),
        )
        .optional()
        .map_err(map_sqlite_error)?;
    if let Some(owner) = owner.filter(|owner| owner != tenant.as_str()) {
        return Err(StoreError::Query {
            detail: format!("domain `{hostname}` already belongs to tenant `{owner}`"),
        });
    }
    tx.execute(
        "INSERT OR REPLACE INTO custom_domains (hostname, tenant_id, verified, ssl_active)
         VALUES (?1, ?2, ?3, ?4)",
        params![hostname, tenant.as_str(), domain.verified, domain.ssl_active],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

fn read_profile(conn: &Connection, tenant: &TenantId) -> Result<StoreProfile, StoreError> {
    conn.query_row(
        "SELECT name, contact_email, description, currency, logo_url
         FROM tenants WHERE tenant_id = ?1",
        params![tenant.as_str()],
        |row| {
            Ok(StoreProfile {
                name: row.get(0)?,
                contact_email: row.get(1)?,
                description: row.get(2)?,
                currency: row.get(3)?,
                logo_url: row.get(4)?,
            })
        },
    )
    .map_err(map_sqlite_error)
}

fn read_branding(conn: &Connection, tenant: &TenantId) -> Result<Branding, StoreError> {
    conn.query_row(
        "SELECT theme_code, primary_color, secondary_color, accent_color, font_family
         FROM branding WHERE tenant_id = ?1",
        params![tenant.as_str()],
        |row| {
            Ok(Branding {
                theme_code: row.get(0)?,
                primary_color: row.get(1)?,
                secondary_color: row.get(2)?,
                accent_color: row.get(3)?,
                font_family: row.get(4)?,
            })
        },
    )
    .optional()
    .map(Option::unwrap_or_default)
    .map_err(map_sqlite_error)
}

fn read_rows<T>(
    conn: &Connection,
    sql: &str,
    tenant: &TenantId,
    map: impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>, StoreError> {
    let mut stmt = conn.prepare(sql).map_err(map_sqlite_error)?;
    let rows = stmt
        .query_map(params![tenant.as_str()], map)
        .map_err(map_sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(map_sqlite_error)
}

fn read_payments(conn: &Connection, tenant: &TenantId) -> Result<Vec<PaymentMethod>, StoreError> {
    read_rows(
        conn,
        "SELECT provider, enabled FROM payment_methods WHERE tenant_id = ?1 ORDER BY provider",
        tenant,
        |row| {
            Ok(PaymentMethod {
                provider: row.get(0)?,
                enabled: row.get(1)?,
            })
        },
    )
}

fn read_catalog(conn: &Connection, tenant: &TenantId) -> Result<Vec<ProductSummary>, StoreError> {
    read_rows(
        conn,
        "SELECT sku, name, price_minor, published, image_count
         FROM products WHERE tenant_id = ?1 ORDER BY sku",
        tenant,
        |row| {
            Ok(ProductSummary {
                sku: row.get(0)?,
                name: row.get(1)?,
                price_minor: row.get(2)?,
                published: row.get(3)?,
                image_count: row.get(4)?,
            })
        },
    )
}

fn read_shipping(conn: &Connection, tenant: &TenantId) -> Result<Vec<ShippingZone>, StoreError> {
    read_rows(
        conn,
        "SELECT name, enabled FROM shipping_zones WHERE tenant_id = ?1 ORDER BY name",
        tenant,
        |row| {
            Ok(ShippingZone {
                name: row.get(0)?,
                enabled: row.get(1)?,
            })
        },
    )
}

fn read_legal(conn: &Connection, tenant: &TenantId) -> Result<Vec<LegalPage>, StoreError> {
    let raw = read_rows(
        conn,
        "SELECT kind, published FROM legal_pages WHERE tenant_id = ?1 ORDER BY kind",
        tenant,
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?)),
    )?;
    raw.into_iter()
        .map(|(kind, published)| {
            LegalPageKind::parse(&kind)
                .map(|kind| LegalPage { kind, published })
                .map_err(|err| StoreError::Query {
                    detail: format!("legal_pages: {err}"),
                })
        })
        .collect()
}

fn read_domains(conn: &Connection, tenant: &TenantId) -> Result<Vec<CustomDomain>, StoreError> {
    read_rows(
        conn,
        "SELECT hostname, verified, ssl_active
         FROM custom_domains WHERE tenant_id = ?1 ORDER BY hostname",
        tenant,
        |row| {
            Ok(CustomDomain {
                hostname: row.get(0)?,
                verified: row.get(1)?,
                ssl_active: row.get(2)?,
            })
        },
    )
}
