//! Integration tests for the order service over the in-memory document store.
//!
//! These tests verify persistence of line changes, error reporting and
//! optimistic concurrency on concurrent writers.

use document_store::{DocumentStoreError, InMemoryDocumentStore};
use domain::{
    AddLine, DomainError, FulfillOrder, LineEntry, Order, OrderError, OrderService, ProductId,
    RemoveLine, SubtractLine,
};
use rust_decimal::Decimal;

/// Helper to create a test order service
fn create_service() -> OrderService<InMemoryDocumentStore> {
    OrderService::new(InMemoryDocumentStore::new())
}

fn qty(units: i64, scale: u32) -> Decimal {
    Decimal::new(units, scale)
}

mod line_operations {
    use super::*;

    #[tokio::test]
    async fn bakery_order_scenario() {
        let service = create_service();
        service.create_order(Order::empty(1, 5)).await.unwrap();

        service
            .add_line(AddLine::new(1, 101, qty(3, 0)))
            .await
            .unwrap();
        service
            .add_line(AddLine::new(1, 102, qty(15, 1)))
            .await
            .unwrap();
        let order = service
            .add_line(AddLine::new(1, 101, qty(2, 0)))
            .await
            .unwrap();

        assert_eq!(
            order.lines().unwrap(),
            &[LineEntry::new(101, qty(5, 0)), LineEntry::new(102, qty(15, 1))]
        );
        assert_eq!(order.total_quantity().unwrap(), qty(65, 1));

        let order = service.remove_line(RemoveLine::new(1, 102)).await.unwrap();
        assert_eq!(order.lines().unwrap(), &[LineEntry::new(101, qty(5, 0))]);
        assert_eq!(order.total_quantity().unwrap(), qty(5, 0));

        // The stored document reflects the same state
        let stored = service.get_order(1).await.unwrap().unwrap();
        assert_eq!(stored, order);
    }

    #[tokio::test]
    async fn subtract_decreases_the_single_matching_line() {
        let service = create_service();
        service.create_order(Order::empty(1, 5)).await.unwrap();
        service
            .add_line(AddLine::new(1, 101, qty(5, 0)))
            .await
            .unwrap();

        let order = service
            .subtract_line(SubtractLine::new(1, 101, qty(1, 0)))
            .await
            .unwrap();
        assert_eq!(
            order.line(ProductId::new(101)).unwrap().quantity,
            qty(4, 0)
        );
    }

    #[tokio::test]
    async fn subtract_without_matching_line_is_not_found() {
        let service = create_service();
        service.create_order(Order::empty(1, 5)).await.unwrap();

        let result = service
            .subtract_line(SubtractLine::new(1, 101, qty(1, 0)))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::LineNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn rejected_operations_leave_document_untouched() {
        let service = create_service();
        service.create_order(Order::empty(1, 5)).await.unwrap();
        service
            .add_line(AddLine::new(1, 101, qty(2, 0)))
            .await
            .unwrap();
        let before = service.get_order(1).await.unwrap().unwrap();

        let zero = service.add_line(AddLine::new(1, 101, Decimal::ZERO)).await;
        assert!(matches!(
            zero,
            Err(DomainError::Order(OrderError::InvalidQuantity { .. }))
        ));

        let negative = service.add_line(AddLine::new(1, 101, qty(-1, 0))).await;
        assert!(matches!(
            negative,
            Err(DomainError::Order(OrderError::InvalidQuantity { .. }))
        ));

        let missing = service.remove_line(RemoveLine::new(1, 999)).await;
        assert!(matches!(
            missing,
            Err(DomainError::Order(OrderError::LineNotFound { .. }))
        ));

        let after = service.get_order(1).await.unwrap().unwrap();
        assert_eq!(after, before);
        assert_eq!(after.line_count(), 1);
    }

    #[tokio::test]
    async fn hydrated_duplicates_are_kept_and_subtract_refuses_them() {
        let service = create_service();
        let order = Order::new(
            1,
            chrono::Utc::now(),
            5,
            Some(vec![
                LineEntry::new(101, qty(1, 0)),
                LineEntry::new(101, qty(2, 0)),
            ]),
        );
        service.create_order(order).await.unwrap();

        let result = service
            .subtract_line(SubtractLine::new(1, 101, qty(1, 0)))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::AmbiguousLine { .. }))
        ));

        let stored = service.get_order(1).await.unwrap().unwrap();
        assert_eq!(stored.line_count(), 2);
        assert_eq!(stored.total_quantity().unwrap(), qty(3, 0));
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn fulfillment_is_persisted() {
        let service = create_service();
        service.create_order(Order::empty(1, 5)).await.unwrap();

        let at = chrono::Utc::now();
        service
            .fulfill_order(FulfillOrder::new(1, at))
            .await
            .unwrap();

        let order = service.get_order(1).await.unwrap().unwrap();
        assert_eq!(order.fulfilled_at(), Some(at));
    }

    #[tokio::test]
    async fn negative_customer_is_stored_as_zero() {
        let service = create_service();
        service
            .create_order(Order::new(1, chrono::Utc::now(), -5, None))
            .await
            .unwrap();

        let order = service.get_order(1).await.unwrap().unwrap();
        assert_eq!(order.customer_id(), 0);
        assert_eq!(service.list_customer_orders(0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_order_id_is_rejected() {
        let service = create_service();
        service.create_order(Order::empty(1, 5)).await.unwrap();

        let result = service.create_order(Order::empty(1, 6)).await;
        assert!(matches!(
            result,
            Err(DomainError::Store(DocumentStoreError::DuplicateKey { .. }))
        ));
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn concurrent_modifications_detected() {
        let service = create_service();
        service.create_order(Order::empty(1, 5)).await.unwrap();

        let repository = service.repository();
        let mut first = repository.load_existing(1).await.unwrap();
        let mut second = repository.load_existing(1).await.unwrap();

        first.entity.add(ProductId::new(101), qty(1, 0)).unwrap();
        repository.save(&first).await.unwrap();

        second.entity.add(ProductId::new(102), qty(1, 0)).unwrap();
        let result = repository.save(&second).await;

        assert!(matches!(
            result,
            Err(DomainError::Store(
                DocumentStoreError::ConcurrencyConflict { .. }
            ))
        ));

        let stored = service.get_order(1).await.unwrap().unwrap();
        assert!(stored.line(ProductId::new(101)).is_some());
        assert!(stored.line(ProductId::new(102)).is_none());
    }

    #[tokio::test]
    async fn sequential_operations_reload_latest_version() {
        let service = create_service();
        service.create_order(Order::empty(1, 5)).await.unwrap();

        for _ in 0..5 {
            service
                .add_line(AddLine::new(1, 101, qty(1, 0)))
                .await
                .unwrap();
        }

        let loaded = service.repository().load_existing(1).await.unwrap();
        assert_eq!(loaded.version.as_i64(), 6);
        assert_eq!(loaded.entity.total_quantity().unwrap(), qty(5, 0));
    }
}
