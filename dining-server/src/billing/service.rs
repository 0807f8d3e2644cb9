//! Settlement and ledger queries
//!
//! Bills only ever move from unsettled to settled. Settlement runs in its own
//! write transaction; redb's single writer serialises it against checkouts.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::models::{Bill, Department, OutstandingDelivery};

use super::repository::{self, BillingRepository};
use super::{BillingError, BillingResult};
use crate::orders::storage::{OrderStorage, StorageError};

#[derive(Clone, Debug)]
pub struct BillingService {
    repo: BillingRepository,
}

impl BillingService {
    pub fn new(storage: OrderStorage) -> Self {
        Self {
            repo: BillingRepository::new(storage),
        }
    }

    /// Bills not yet reconciled, optionally for one department
    pub fn unsettled_bills(&self, department: Option<Department>) -> BillingResult<Vec<Bill>> {
        self.bills_where(false, department)
    }

    /// Reconciled bills, optionally for one department
    pub fn settled_bills(&self, department: Option<Department>) -> BillingResult<Vec<Bill>> {
        self.bills_where(true, department)
    }

    /// Every bill, optionally for one department
    pub fn all_bills(&self, department: Option<Department>) -> BillingResult<Vec<Bill>> {
        let bills = self.repo.find_all()?;
        Ok(bills
            .into_iter()
            .filter(|b| department.is_none_or(|d| b.department == d))
            .collect())
    }

    fn bills_where(&self, settled: bool, department: Option<Department>) -> BillingResult<Vec<Bill>> {
        Ok(self
            .all_bills(department)?
            .into_iter()
            .filter(|b| b.settled == settled)
            .collect())
    }

    pub fn get_bill(&self, bill_id: &str) -> BillingResult<Bill> {
        self.repo
            .find_by_id(bill_id)?
            .ok_or_else(|| BillingError::BillNotFound(bill_id.to_string()))
    }

    pub fn get_bill_for_order(&self, order_id: &str) -> BillingResult<Bill> {
        self.repo
            .find_for_order(order_id)?
            .ok_or_else(|| BillingError::NoBillForOrder(order_id.to_string()))
    }

    /// Mark a bill settled
    ///
    /// For delivery bills the driver's cash is recorded as handed over in the
    /// same transaction.
    pub fn settle_bill(&self, bill_id: &str, settled_by: &str) -> BillingResult<Bill> {
        let txn = self.repo.begin_write()?;

        let mut bill = repository::get_bill_txn(&txn, bill_id)?
            .ok_or_else(|| BillingError::BillNotFound(bill_id.to_string()))?;
        if bill.settled {
            return Err(BillingError::BillAlreadySettled(bill_id.to_string()));
        }

        let now = shared::util::now_millis();
        bill.settled = true;
        bill.settled_at = Some(now);
        bill.settled_by = Some(settled_by.to_string());
        repository::put_bill_txn(&txn, &bill)?;

        if bill.department == Department::Delivery {
            match repository::get_delivery_txn(&txn, &bill.order_id)? {
                Some(mut delivery) => {
                    delivery.cash_handed_over = true;
                    delivery.handed_over_at = Some(now);
                    repository::put_delivery_txn(&txn, &delivery)?;
                }
                None => {
                    tracing::warn!(bill_id = %bill.bill_id, order_id = %bill.order_id, "Delivery bill has no delivery record");
                }
            }
        }

        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            bill_id = %bill.bill_id,
            order_id = %bill.order_id,
            department = ?bill.department,
            amount = %bill.amount,
            settled_by = %settled_by,
            "Bill settled"
        );
        Ok(bill)
    }

    /// Delivery cash still held by drivers, grouped per driver
    pub fn outstanding_deliveries(&self) -> BillingResult<Vec<OutstandingDelivery>> {
        let deliveries = self.repo.find_all_deliveries()?;
        let bills = self.unsettled_bills(Some(Department::Delivery))?;

        let mut by_driver: BTreeMap<Option<String>, OutstandingDelivery> = BTreeMap::new();
        for bill in bills {
            let delivery = deliveries.iter().find(|d| d.order_id == bill.order_id);
            if delivery.is_some_and(|d| d.cash_handed_over) {
                continue;
            }
            let driver_id = delivery.and_then(|d| d.driver_id.clone());
            let entry = by_driver
                .entry(driver_id.clone())
                .or_insert_with(|| OutstandingDelivery {
                    driver_id,
                    driver_name: delivery.and_then(|d| d.driver_name.clone()),
                    bill_ids: Vec::new(),
                    total: Decimal::ZERO,
                });
            entry.bill_ids.push(bill.bill_id);
            entry.total += bill.amount;
        }

        Ok(by_driver.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Delivery, PaymentMethod};

    fn sample_bill(bill_id: &str, order_id: &str, department: Department, amount: i64) -> Bill {
        Bill {
            bill_id: bill_id.to_string(),
            order_id: order_id.to_string(),
            order_number: format!("ORD20261019{}", bill_id),
            amount: Decimal::new(amount, 0),
            payment_method: PaymentMethod::Cash,
            department,
            settled: false,
            settled_at: None,
            settled_by: None,
            created_at: 1,
            created_by: "op-1".to_string(),
        }
    }

    fn sample_delivery(order_id: &str, driver_id: Option<&str>) -> Delivery {
        Delivery {
            delivery_id: format!("dlv-{}", order_id),
            order_id: order_id.to_string(),
            driver_id: driver_id.map(str::to_string),
            driver_name: driver_id.map(|d| format!("Driver {}", d)),
            address: None,
            customer_phone: None,
            cash_handed_over: false,
            handed_over_at: None,
            created_at: 1,
        }
    }

    fn seeded_service() -> BillingService {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        repository::insert_bill_txn(&txn, &sample_bill("b1", "o1", Department::Cashier, 25000))
            .unwrap();
        repository::insert_bill_txn(&txn, &sample_bill("b2", "o2", Department::Delivery, 40000))
            .unwrap();
        repository::insert_bill_txn(&txn, &sample_bill("b3", "o3", Department::Delivery, 15000))
            .unwrap();
        repository::put_delivery_txn(&txn, &sample_delivery("o2", Some("drv-1"))).unwrap();
        repository::put_delivery_txn(&txn, &sample_delivery("o3", Some("drv-1"))).unwrap();
        txn.commit().unwrap();
        BillingService::new(storage)
    }

    #[test]
    fn test_settle_partitions_bills() {
        let service = seeded_service();
        assert_eq!(service.unsettled_bills(None).unwrap().len(), 3);
        assert!(service.settled_bills(None).unwrap().is_empty());

        let bill = service.settle_bill("b1", "admin-1").unwrap();
        assert!(bill.settled);
        assert_eq!(bill.settled_by.as_deref(), Some("admin-1"));
        assert!(bill.settled_at.is_some());

        let settled = service.settled_bills(None).unwrap();
        let unsettled = service.unsettled_bills(None).unwrap();
        assert_eq!(settled.len() + unsettled.len(), 3);
        assert!(settled.iter().all(|s| unsettled.iter().all(|u| u.bill_id != s.bill_id)));
    }

    #[test]
    fn test_settle_twice_fails() {
        let service = seeded_service();
        service.settle_bill("b1", "admin-1").unwrap();
        assert!(matches!(
            service.settle_bill("b1", "admin-1"),
            Err(BillingError::BillAlreadySettled(_))
        ));
        assert!(matches!(
            service.settle_bill("missing", "admin-1"),
            Err(BillingError::BillNotFound(_))
        ));
    }

    #[test]
    fn test_department_filter() {
        let service = seeded_service();
        let delivery = service.unsettled_bills(Some(Department::Delivery)).unwrap();
        assert_eq!(delivery.len(), 2);
        assert!(delivery.iter().all(|b| b.department == Department::Delivery));
    }

    #[test]
    fn test_outstanding_deliveries_cleared_by_settlement() {
        let service = seeded_service();

        let outstanding = service.outstanding_deliveries().unwrap();
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].driver_id.as_deref(), Some("drv-1"));
        assert_eq!(outstanding[0].total, Decimal::new(55000, 0));

        service.settle_bill("b2", "admin-1").unwrap();
        let delivery = service.repo.get_delivery("o2").unwrap().unwrap();
        assert!(delivery.cash_handed_over);

        let outstanding = service.outstanding_deliveries().unwrap();
        assert_eq!(outstanding[0].bill_ids, vec!["b3".to_string()]);
        assert_eq!(outstanding[0].total, Decimal::new(15000, 0));
    }

    #[test]
    fn test_bill_for_order() {
        let service = seeded_service();
        assert_eq!(service.get_bill_for_order("o2").unwrap().bill_id, "b2");
        assert!(matches!(
            service.get_bill_for_order("o9"),
            Err(BillingError::NoBillForOrder(_))
        ));
    }
}
