use std::collections::HashSet;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::venue_model::{CourtRow, FacilityRow, VenueWithCourts};
use crate::types::venue_types::{CreateVenueInput, UpdateVenueInput};
use crate::utils::error::AppError;

const FACILITY_COLUMNS: &str = "id, owner_id, name, address, city, starting_price_per_hour, \
                                status, images, created_at, updated_at";
const COURT_COLUMNS: &str = "id, facility_id, name, sport, price_per_hour, created_at, updated_at";

/// Diff of incoming court ids against the stored set. Courts keep their
/// ids across an update so in-flight bookings stay pointed at live rows.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CourtReconciliation {
    pub retained: Vec<Uuid>,
    pub removed: Vec<Uuid>,
    pub added: usize,
}

pub(crate) fn plan_court_reconciliation(
    stored: &[Uuid],
    incoming: &[Option<Uuid>],
) -> CourtReconciliation {
    let incoming_ids: HashSet<Uuid> = incoming.iter().flatten().copied().collect();
    CourtReconciliation {
        retained: stored
            .iter()
            .filter(|id| incoming_ids.contains(id))
            .copied()
            .collect(),
        removed: stored
            .iter()
            .filter(|id| !incoming_ids.contains(id))
            .copied()
            .collect(),
        added: incoming.iter().filter(|id| id.is_none()).count(),
    }
}

pub async fn create_venue(
    pool: &PgPool,
    owner_id: Uuid,
    input: &CreateVenueInput,
) -> Result<VenueWithCourts, AppError> {
    let duplicate: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM facilities WHERE owner_id = $1 AND name = $2")
            .bind(owner_id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await?;
    if duplicate.is_some() {
        return Err(AppError::InvalidArgs(
            "Venue name already exists for this owner.".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let facility = sqlx::query_as::<_, FacilityRow>(&format!(
        "INSERT INTO facilities (id, owner_id, name, address, city, starting_price_per_hour, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
         RETURNING {}",
        FACILITY_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(&input.name)
    .bind(&input.address)
    .bind(&input.city)
    .bind(input.starting_price_per_hour)
    .fetch_one(&mut *tx)
    .await?;

    let mut courts = Vec::with_capacity(input.courts.len());
    for court in &input.courts {
        let row = insert_court(&mut tx, facility.id, &court.name, &court.sport, court.price_per_hour)
            .await?;
        courts.push(row);
    }

    tx.commit().await?;
    Ok(VenueWithCourts { facility, courts })
}

pub async fn update_venue(
    pool: &PgPool,
    input: &UpdateVenueInput,
) -> Result<VenueWithCourts, AppError> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM facilities WHERE id = $1")
        .bind(input.id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::InvalidArgs("Venue does not exist.".to_string()));
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE facilities
         SET owner_id = $2, name = $3, address = $4, city = $5,
             starting_price_per_hour = $6, status = COALESCE($7, status), updated_at = NOW()
         WHERE id = $1",
    )
    .bind(input.id)
    .bind(input.owner_id)
    .bind(&input.name)
    .bind(&input.address)
    .bind(&input.city)
    .bind(input.starting_price_per_hour)
    .bind(input.status.as_deref())
    .execute(&mut *tx)
    .await?;

    let stored: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM courts WHERE facility_id = $1")
        .bind(input.id)
        .fetch_all(&mut *tx)
        .await?;
    let incoming: Vec<Option<Uuid>> = input.courts.iter().map(|c| c.id).collect();
    let plan = plan_court_reconciliation(&stored, &incoming);

    if !plan.removed.is_empty() {
        sqlx::query("DELETE FROM courts WHERE facility_id = $1 AND id = ANY($2)")
            .bind(input.id)
            .bind(&plan.removed[..])
            .execute(&mut *tx)
            .await?;
    }

    for court in &input.courts {
        match court.id {
            Some(court_id) => {
                let res = sqlx::query(
                    "UPDATE courts
                     SET name = $3, sport = $4, price_per_hour = $5, updated_at = NOW()
                     WHERE id = $2 AND facility_id = $1",
                )
                .bind(input.id)
                .bind(court_id)
                .bind(&court.name)
                .bind(&court.sport)
                .bind(court.price_per_hour)
                .execute(&mut *tx)
                .await?;
                if res.rows_affected() < 1 {
                    return Err(AppError::Internal(format!(
                        "court {} is not part of venue {}",
                        court_id, input.id
                    )));
                }
            }
            None => {
                insert_court(&mut tx, input.id, &court.name, &court.sport, court.price_per_hour)
                    .await?;
            }
        }
    }

    let venue = fetch_venue_with_courts(&mut tx, input.id).await?;
    tx.commit().await?;
    Ok(venue)
}

pub async fn delete_venue(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM facilities WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::InvalidArgs("Venue does not exist.".to_string()));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM courts WHERE facility_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM facilities WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn get_venue(pool: &PgPool, id: Uuid) -> Result<VenueWithCourts, AppError> {
    let facility = sqlx::query_as::<_, FacilityRow>(&format!(
        "SELECT {} FROM facilities WHERE id = $1",
        FACILITY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::InvalidArgs("Venue not found.".to_string()))?;

    let courts = courts_of(pool, id).await?;
    Ok(VenueWithCourts { facility, courts })
}

pub async fn list_venues(
    pool: &PgPool,
    query: Option<&str>,
    page: i64,
    page_size: i64,
) -> Result<(Vec<VenueWithCourts>, i64), AppError> {
    let pattern = query
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q));

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM facilities WHERE ($1::text IS NULL OR name ILIKE $1)",
    )
    .bind(pattern.as_deref())
    .fetch_one(pool)
    .await?;

    let facilities = sqlx::query_as::<_, FacilityRow>(&format!(
        "SELECT {} FROM facilities
         WHERE ($1::text IS NULL OR name ILIKE $1)
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3",
        FACILITY_COLUMNS
    ))
    .bind(pattern.as_deref())
    .bind(page_size)
    .bind((page - 1) * page_size)
    .fetch_all(pool)
    .await?;

    let mut venues = Vec::with_capacity(facilities.len());
    for facility in facilities {
        let courts = courts_of(pool, facility.id).await?;
        venues.push(VenueWithCourts { facility, courts });
    }
    Ok((venues, total))
}

async fn insert_court(
    tx: &mut Transaction<'_, Postgres>,
    facility_id: Uuid,
    name: &str,
    sport: &str,
    price_per_hour: f64,
) -> Result<CourtRow, AppError> {
    let row = sqlx::query_as::<_, CourtRow>(&format!(
        "INSERT INTO courts (id, facility_id, name, sport, price_per_hour, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
         RETURNING {}",
        COURT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(facility_id)
    .bind(name)
    .bind(sport)
    .bind(price_per_hour)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}

async fn fetch_venue_with_courts(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<VenueWithCourts, AppError> {
    let facility = sqlx::query_as::<_, FacilityRow>(&format!(
        "SELECT {} FROM facilities WHERE id = $1",
        FACILITY_COLUMNS
    ))
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    let courts = sqlx::query_as::<_, CourtRow>(&format!(
        "SELECT {} FROM courts WHERE facility_id = $1 ORDER BY created_at ASC",
        COURT_COLUMNS
    ))
    .bind(id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(VenueWithCourts { facility, courts })
}

async fn courts_of(pool: &PgPool, facility_id: Uuid) -> Result<Vec<CourtRow>, AppError> {
    let courts = sqlx::query_as::<_, CourtRow>(&format!(
        "SELECT {} FROM courts WHERE facility_id = $1 ORDER BY created_at ASC",
        COURT_COLUMNS
    ))
    .bind(facility_id)
    .fetch_all(pool)
    .await?;
    Ok(courts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::venue_types::CourtPayload;

    async fn seed_owner(pool: &PgPool) -> Uuid {
        let owner_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, full_name, email, password, role)
             VALUES ($1, $2, $3, $4, 'OWNER')",
        )
        .bind(owner_id)
        .bind("Ravi Mehta")
        .bind(format!("{}@example.com", owner_id.simple()))
        .bind("hash")
        .execute(pool)
        .await
        .unwrap();
        owner_id
    }

    fn two_court_venue() -> CreateVenueInput {
        CreateVenueInput {
            name: "Smash Arena".to_string(),
            address: "12 Lake Road".to_string(),
            city: "Pune".to_string(),
            starting_price_per_hour: 100.0,
            courts: vec![
                CourtPayload {
                    id: None,
                    name: "Court 1".to_string(),
                    sport: "BADMINTON".to_string(),
                    price_per_hour: 100.0,
                },
                CourtPayload {
                    id: None,
                    name: "Court 2".to_string(),
                    sport: "TENNIS".to_string(),
                    price_per_hour: 120.0,
                },
            ],
        }
    }

    // An update whose court reconciliation fails midway must leave the
    // venue exactly as it was, scalar fields and courts alike.
    #[sqlx::test]
    async fn failed_court_update_rolls_the_whole_venue_back(pool: PgPool) {
        let owner_id = seed_owner(&pool).await;
        let venue = create_venue(&pool, owner_id, &two_court_venue())
            .await
            .unwrap();
        assert_eq!(venue.courts.len(), 2);

        let update = UpdateVenueInput {
            id: venue.facility.id,
            owner_id,
            name: "Renamed Arena".to_string(),
            address: venue.facility.address.clone(),
            city: venue.facility.city.clone(),
            starting_price_per_hour: 150.0,
            status: Some("APPROVED".to_string()),
            courts: vec![CourtPayload {
                // References a court this venue never owned.
                id: Some(Uuid::new_v4()),
                name: "Ghost Court".to_string(),
                sport: "CRICKET".to_string(),
                price_per_hour: 90.0,
            }],
        };
        assert!(update_venue(&pool, &update).await.is_err());

        let after = get_venue(&pool, venue.facility.id).await.unwrap();
        assert_eq!(after.facility.name, "Smash Arena");
        assert_eq!(after.facility.status, "PENDING");
        assert_eq!(after.facility.starting_price_per_hour, 100.0);
        assert_eq!(after.courts.len(), 2);
    }

    #[sqlx::test]
    async fn update_reconciles_courts_in_place(pool: PgPool) {
        let owner_id = seed_owner(&pool).await;
        let venue = create_venue(&pool, owner_id, &two_court_venue())
            .await
            .unwrap();
        let kept = venue.courts[0].clone();

        let update = UpdateVenueInput {
            id: venue.facility.id,
            owner_id,
            name: venue.facility.name.clone(),
            address: venue.facility.address.clone(),
            city: venue.facility.city.clone(),
            starting_price_per_hour: 100.0,
            status: None,
            courts: vec![
                CourtPayload {
                    id: Some(kept.id),
                    name: "Center Court".to_string(),
                    sport: kept.sport.clone(),
                    price_per_hour: 110.0,
                },
                CourtPayload {
                    id: None,
                    name: "Court 3".to_string(),
                    sport: "FOOTBALL".to_string(),
                    price_per_hour: 200.0,
                },
            ],
        };
        let after = update_venue(&pool, &update).await.unwrap();

        assert_eq!(after.courts.len(), 2);
        let renamed = after.courts.iter().find(|c| c.id == kept.id).unwrap();
        assert_eq!(renamed.name, "Center Court");
        assert!(after.courts.iter().any(|c| c.name == "Court 3"));
        assert!(!after.courts.iter().any(|c| c.id == venue.courts[1].id));
    }

    #[test]
    fn reconciliation_splits_retained_removed_and_added() {
        let kept = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let plan = plan_court_reconciliation(&[kept, gone], &[Some(kept), None, None]);
        assert_eq!(plan.retained, vec![kept]);
        assert_eq!(plan.removed, vec![gone]);
        assert_eq!(plan.added, 2);
    }

    #[test]
    fn all_new_courts_remove_every_stored_one() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let plan = plan_court_reconciliation(&[a, b], &[None]);
        assert!(plan.retained.is_empty());
        assert_eq!(plan.removed, vec![a, b]);
        assert_eq!(plan.added, 1);
    }

    #[test]
    fn identical_sets_change_nothing() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let plan = plan_court_reconciliation(&[a, b], &[Some(b), Some(a)]);
        assert_eq!(plan.retained, vec![a, b]);
        assert!(plan.removed.is_empty());
        assert_eq!(plan.added, 0);
    }

    #[test]
    fn empty_store_only_adds() {
        let plan = plan_court_reconciliation(&[], &[None, None]);
        assert!(plan.retained.is_empty());
        assert!(plan.removed.is_empty());
        assert_eq!(plan.added, 2);
    }
}
