//! Street-works permit summary.
//!
//! Distinct completed permits for a USRN over the configured month window,
//! grouped by promoter organisation, each promoter classified into a utility
//! sector by the regulator licences on its SWA code.

use tracing::{debug, warn};

use streetlens_common::error::{Result, StreetlensError};
use streetlens_common::types::{Usrn, WorkSummaryEntry};

use crate::pool::Warehouse;

/// Build the summary SQL for the configured permit and SWA-code tables.
/// SWA codes are stored as text in both tables but not consistently padded,
/// so the join compares them as integers.
pub(crate) fn work_summary_sql(permit_table: &str, swa_table: &str) -> String {
    format!(
        r#"
        WITH base_data AS (
            SELECT
                permit_reference_number,
                promoter_organisation,
                promoter_swa_code
            FROM {permit_table}
            WHERE work_status_ref = 'completed'
              AND event_type = 'WORK_STOP'
              AND usrn = $1
              AND event_month BETWEEN $2 AND $3
        ),
        distinct_permits AS (
            SELECT DISTINCT
                permit_reference_number,
                promoter_organisation,
                promoter_swa_code
            FROM base_data
        ),
        sector_classification AS (
            SELECT
                dp.promoter_organisation,
                dp.promoter_swa_code,
                CASE
                    WHEN sw.ofwat_licence IS NOT NULL THEN 'Water'
                    WHEN sw.ofgem_electricity_licence IS NOT NULL THEN 'Electricity'
                    WHEN sw.ofgem_gas_licence IS NOT NULL THEN 'Gas'
                    WHEN sw.ofcom_licence IS NOT NULL THEN 'Telecommunications'
                    WHEN sw.swa_code IS NOT NULL THEN 'Highway Authority'
                    ELSE 'Other'
                END AS sector
            FROM (SELECT DISTINCT promoter_organisation, promoter_swa_code FROM distinct_permits) dp
            LEFT JOIN {swa_table} sw
                ON CAST(dp.promoter_swa_code AS INT) = CAST(sw.swa_code AS INT)
        )
        SELECT
            dp.promoter_organisation,
            COALESCE(sc.sector, 'Other') AS sector,
            COUNT(DISTINCT dp.permit_reference_number)::BIGINT AS total_works
        FROM distinct_permits dp
        LEFT JOIN sector_classification sc
            ON dp.promoter_organisation = sc.promoter_organisation
           AND dp.promoter_swa_code = sc.promoter_swa_code
        GROUP BY
            dp.promoter_organisation,
            sc.sector
        ORDER BY
            total_works DESC,
            dp.promoter_organisation
        "#
    )
}

impl Warehouse {
    /// Completed-works summary for a USRN. An empty result is not an error —
    /// most streets have no recent works.
    pub async fn work_summary(&self, usrn: &Usrn) -> Result<Vec<WorkSummaryEntry>> {
        let client = self.client().await?;
        let sql = work_summary_sql(&self.config.permit_table, &self.config.swa_table);

        let rows = client
            .query(
                &sql,
                &[
                    &usrn.as_str(),
                    &self.config.summary_month_from,
                    &self.config.summary_month_to,
                ],
            )
            .await
            .map_err(|e| StreetlensError::Warehouse(format!("work summary query: {e}")))?;

        if rows.is_empty() {
            warn!(%usrn, "no work history found for USRN");
            return Ok(Vec::new());
        }

        let entries: Vec<WorkSummaryEntry> = rows
            .iter()
            .map(|row| WorkSummaryEntry {
                promoter_organisation: row.get(0),
                sector: row.get(1),
                total_works: row.get(2),
            })
            .collect();

        debug!(%usrn, promoters = entries.len(), "work summary retrieved");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_sql_scopes_to_completed_work_stops() {
        let sql = work_summary_sql("street_manager.permit_events", "geoplace.latest_active");
        assert!(sql.contains("work_status_ref = 'completed'"));
        assert!(sql.contains("event_type = 'WORK_STOP'"));
        assert!(sql.contains("event_month BETWEEN $2 AND $3"));
        assert!(sql.contains("FROM street_manager.permit_events"));
        assert!(sql.contains("LEFT JOIN geoplace.latest_active"));
    }

    #[test]
    fn test_summary_sql_classifies_every_regulator() {
        let sql = work_summary_sql("p", "s");
        for sector in [
            "'Water'",
            "'Electricity'",
            "'Gas'",
            "'Telecommunications'",
            "'Highway Authority'",
            "'Other'",
        ] {
            assert!(sql.contains(sector), "missing sector {sector}");
        }
    }
}
