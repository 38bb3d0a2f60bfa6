//! `PostgreSQL` repository implementation for order lifecycle storage.

use super::{
    models::{HistoryRow, NewHistoryRow, NewOrderRow, OrderChangeset, OrderRow},
    schema::{order_status_history, orders},
};
use crate::order::{
    domain::{
        Actor, Order, OrderDraft, OrderFieldsUpdate, OrderFilter, OrderId, OrderStatus,
        PersistedOrderData, Priority, Quantity, StatusChange, StatusHistoryEntry,
    },
    ports::{OrderRepository, OrderRepositoryError, OrderRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by order adapters.
pub type OrderPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed order repository.
///
/// Every mutating call runs inside a single transaction so an order row and
/// its history entries commit or roll back together.
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: OrderPgPool,
}

impl PostgresOrderRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: OrderPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> OrderRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> OrderRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(OrderRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(OrderRepositoryError::persistence)?
    }
}

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`OrderRepositoryError::Persistence`] when the pool cannot open
/// its initial connections.
pub fn build_pool(database_url: &str, max_size: u32) -> OrderRepositoryResult<OrderPgPool> {
    Pool::builder()
        .max_size(max_size.max(1))
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .map_err(OrderRepositoryError::persistence)
}

impl From<DieselError> for OrderRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, draft: OrderDraft) -> OrderRepositoryResult<Order> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, OrderRepositoryError, _>(|tx| {
                // Concurrent creations may read the same maximum; the unique
                // constraints do not cover priority.
                let highest = orders::table
                    .select(diesel::dsl::max(orders::priority))
                    .first::<Option<i32>>(tx)?;
                let priority = Priority::next_after(highest.map(Priority::new));
                let (order, entry) = Order::create(draft, priority);

                diesel::insert_into(orders::table)
                    .values(&to_new_row(&order)?)
                    .execute(tx)
                    .map_err(|err| map_insert_error(err, &order))?;
                diesel::insert_into(order_status_history::table)
                    .values(&to_history_row(&entry))
                    .execute(tx)?;
                Ok(order)
            })
        })
        .await
    }

    async fn apply_transition(
        &self,
        id: OrderId,
        change: &StatusChange,
    ) -> OrderRepositoryResult<Order> {
        let change = change.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, OrderRepositoryError, _>(|tx| {
                let mut order = lock_order(tx, id)?;
                let entry = order.apply_transition(&change);
                write_order(tx, &order)?;
                if let Some(history_entry) = entry {
                    diesel::insert_into(order_status_history::table)
                        .values(&to_history_row(&history_entry))
                        .execute(tx)?;
                }
                Ok(order)
            })
        })
        .await
    }

    async fn update_fields(
        &self,
        id: OrderId,
        update: &OrderFieldsUpdate,
    ) -> OrderRepositoryResult<Order> {
        let update = update.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, OrderRepositoryError, _>(|tx| {
                let mut order = lock_order(tx, id)?;
                order.apply_fields(&update);
                write_order(tx, &order)?;
                Ok(order)
            })
        })
        .await
    }

    async fn delete(&self, id: OrderId) -> OrderRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, OrderRepositoryError, _>(|tx| {
                diesel::delete(
                    order_status_history::table
                        .filter(order_status_history::order_id.eq(id.into_inner())),
                )
                .execute(tx)?;
                let removed = diesel::delete(orders::table.filter(orders::id.eq(id.into_inner())))
                    .execute(tx)?;
                if removed == 0 {
                    return Err(OrderRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: OrderId) -> OrderRepositoryResult<Option<Order>> {
        self.run_blocking(move |connection| {
            let row = orders::table
                .filter(orders::id.eq(id.into_inner()))
                .select(OrderRow::as_select())
                .first::<OrderRow>(connection)
                .optional()?;
            row.map(row_to_order).transpose()
        })
        .await
    }

    async fn list(&self, filter: &OrderFilter) -> OrderRepositoryResult<Vec<Order>> {
        let filter = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = orders::table.select(OrderRow::as_select()).into_boxed();
            if let Some(statuses) = filter.statuses() {
                let codes: Vec<i16> = statuses.iter().copied().map(OrderStatus::code).collect();
                query = query.filter(orders::status_code.eq_any(codes));
            }
            let rows = query
                .order((
                    orders::urgent.desc(),
                    orders::priority.asc(),
                    orders::created_at.asc(),
                    orders::id.asc(),
                ))
                .load::<OrderRow>(connection)?;

            // Reference and period predicates share the in-memory matcher so
            // both adapters agree on case folding and local-time month bounds.
            let mut matched = Vec::with_capacity(rows.len());
            for row in rows {
                let order = row_to_order(row)?;
                if filter.matches(&order) {
                    matched.push(order);
                }
            }
            Ok(matched)
        })
        .await
    }

    async fn history(&self, id: OrderId) -> OrderRepositoryResult<Vec<StatusHistoryEntry>> {
        self.run_blocking(move |connection| {
            let exists = orders::table
                .filter(orders::id.eq(id.into_inner()))
                .select(orders::id)
                .first::<uuid::Uuid>(connection)
                .optional()?;
            if exists.is_none() {
                return Err(OrderRepositoryError::NotFound(id));
            }

            order_status_history::table
                .filter(order_status_history::order_id.eq(id.into_inner()))
                .order((
                    order_status_history::changed_at.asc(),
                    order_status_history::id.asc(),
                ))
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)?
                .into_iter()
                .map(row_to_history)
                .collect()
        })
        .await
    }
}

fn lock_order(connection: &mut PgConnection, id: OrderId) -> OrderRepositoryResult<Order> {
    let row = orders::table
        .filter(orders::id.eq(id.into_inner()))
        .select(OrderRow::as_select())
        .for_update()
        .first::<OrderRow>(connection)
        .optional()?;
    row.map(row_to_order)
        .transpose()?
        .ok_or(OrderRepositoryError::NotFound(id))
}

fn write_order(connection: &mut PgConnection, order: &Order) -> OrderRepositoryResult<()> {
    let changeset = OrderChangeset {
        reference: order.reference().to_owned(),
        equipment: order.equipment().to_owned(),
        service_description: order.service_description().to_owned(),
        system_image: order.system_image().map(str::to_owned),
        quantity: quantity_column(order.quantity())?,
        status_code: order.status().code(),
        urgent: order.is_urgent(),
        priority: order.priority().value(),
        concluded_at: order.concluded_at(),
        last_modified_by: order.last_modified_by().as_str().to_owned(),
    };
    diesel::update(orders::table.filter(orders::id.eq(order.id().into_inner())))
        .set(&changeset)
        .execute(connection)?;
    Ok(())
}

fn quantity_column(quantity: Quantity) -> OrderRepositoryResult<i32> {
    i32::try_from(quantity.value()).map_err(OrderRepositoryError::persistence)
}

fn to_new_row(order: &Order) -> OrderRepositoryResult<NewOrderRow> {
    Ok(NewOrderRow {
        id: order.id().into_inner(),
        code: order.code().map(str::to_owned),
        reference: order.reference().to_owned(),
        equipment: order.equipment().to_owned(),
        service_description: order.service_description().to_owned(),
        system_image: order.system_image().map(str::to_owned),
        quantity: quantity_column(order.quantity())?,
        status_code: order.status().code(),
        urgent: order.is_urgent(),
        priority: order.priority().value(),
        created_at: order.created_at(),
        concluded_at: order.concluded_at(),
        last_modified_by: order.last_modified_by().as_str().to_owned(),
    })
}

fn to_history_row(entry: &StatusHistoryEntry) -> NewHistoryRow {
    NewHistoryRow {
        order_id: entry.order_id().into_inner(),
        previous_status_code: entry.previous_status().map(OrderStatus::code),
        new_status_code: entry.new_status().code(),
        changed_at: entry.changed_at(),
        changed_by: entry.changed_by().as_str().to_owned(),
    }
}

fn row_to_order(row: OrderRow) -> OrderRepositoryResult<Order> {
    let OrderRow {
        id,
        code,
        reference,
        equipment,
        service_description,
        system_image,
        quantity,
        status_code,
        urgent,
        priority,
        created_at,
        concluded_at,
        last_modified_by,
    } = row;

    let status = OrderStatus::from_code(status_code).map_err(OrderRepositoryError::persistence)?;
    let data = PersistedOrderData {
        id: OrderId::from_uuid(id),
        code,
        reference,
        equipment,
        service_description,
        system_image,
        quantity: Quantity::from_persisted(quantity),
        status,
        urgent,
        priority: Priority::new(priority),
        created_at,
        concluded_at,
        last_modified_by: Actor::new(last_modified_by),
    };
    Ok(Order::from_persisted(data))
}

fn row_to_history(row: HistoryRow) -> OrderRepositoryResult<StatusHistoryEntry> {
    let order_id = OrderId::from_uuid(row.order_id);
    let new_status =
        OrderStatus::from_code(row.new_status_code).map_err(OrderRepositoryError::persistence)?;
    let actor = Actor::new(row.changed_by);
    let Some(code) = row.previous_status_code else {
        return Ok(StatusHistoryEntry::created(
            order_id,
            new_status,
            row.changed_at,
            actor,
        ));
    };
    let previous = OrderStatus::from_code(code).map_err(OrderRepositoryError::persistence)?;
    Ok(StatusHistoryEntry::changed(
        order_id,
        previous,
        new_status,
        row.changed_at,
        actor,
    ))
}

fn map_insert_error(err: DieselError, order: &Order) -> OrderRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_code_unique_violation(info.as_ref()) =>
        {
            OrderRepositoryError::DuplicateOrder(order.code().unwrap_or_default().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            OrderRepositoryError::DuplicateOrder(order.id().to_string())
        }
        _ => OrderRepositoryError::persistence(err),
    }
}

fn is_code_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "orders_code_key")
}
