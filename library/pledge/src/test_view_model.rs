use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::environment::{Environment, SessionStore};
use crate::format::{AmountOptions, CurrencyFormatter, FormattedAmount};
use crate::signal::Subscription;
use crate::types::{Country, Project, ProjectStats, Reward, User};
use crate::view_model::{preview, PledgeViewData, PledgeViewModel, PledgeViewModelType};
use crate::PledgeConfig;

// 2017-10-01T22:35:15Z
const DELIVERY: i64 = 1_506_897_315;

pub(crate) fn project_us() -> Project {
    Project {
        id: 1,
        name: "The Project".to_string(),
        slug: "the-project".to_string(),
        country: Country::us(),
        stats: ProjectStats {
            omit_us_currency_code: true,
            ..ProjectStats::default()
        },
        rewards: Vec::new(),
    }
}

fn project_in(code: &str) -> Project {
    Project {
        id: 2,
        country: Country::find(code).unwrap(),
        ..project_us()
    }
}

fn reward_with_minimum(id: u64, minimum: f64) -> Reward {
    Reward {
        id,
        title: Some(format!("Tier {id}")),
        minimum,
        estimated_delivery_on: Some(DELIVERY),
        shipping_enabled: true,
    }
}

fn setup() -> (Arc<SessionStore>, PledgeViewModel) {
    let session = Arc::new(SessionStore::new());
    let vm = PledgeViewModel::new(Environment::new(session.clone()));
    (session, vm)
}

fn record(vm: &PledgeViewModel) -> (Rc<RefCell<Vec<PledgeViewData>>>, Subscription) {
    let values = Rc::new(RefCell::new(Vec::new()));
    let sink = values.clone();
    let sub = vm
        .snapshots()
        .observe(move |data: &PledgeViewData| sink.borrow_mut().push(data.clone()));
    (values, sub)
}

fn blob() -> User {
    User {
        id: 1,
        name: "Blob".to_string(),
    }
}

/// A formatter that knows no currencies at all.
struct NoCurrencies;

impl CurrencyFormatter for NoCurrencies {
    fn symbol_for(&self, country_code: &str) -> String {
        format!(" {country_code} ")
    }

    fn attributed_amount(&self, _: f64, _: &str, _: &AmountOptions) -> Option<FormattedAmount> {
        None
    }
}

#[test]
fn test_configure_then_ready_emits_once() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.configure(project_us(), reward_with_minimum(1, 25.0));
    assert!(values.borrow().is_empty());

    vm.view_ready();

    let values = values.borrow();
    assert_eq!(values.len(), 1);
    let data = &values[0];
    assert_eq!(data.amount, 25.0);
    assert_eq!(data.currency_label, "$");
    assert_eq!(data.delivery_label, "October 2017");
    assert_eq!(data.shipping.location, "Brooklyn");
    assert_eq!(
        data.shipping.amount.as_ref().map(|a| a.plain()).as_deref(),
        Some("+$7.50")
    );
    assert!(!data.is_authenticated);
}

#[test]
fn test_ready_then_configure_emits_once() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.view_ready();
    assert!(values.borrow().is_empty());

    vm.configure(project_us(), reward_with_minimum(1, 10.0));
    assert_eq!(values.borrow().len(), 1);
    assert_eq!(values.borrow()[0].amount, 10.0);
}

#[test]
fn test_silent_without_ready() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    for i in 0..5 {
        vm.configure(project_us(), reward_with_minimum(i, i as f64));
    }
    assert!(values.borrow().is_empty());
}

#[test]
fn test_silent_without_configure() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.view_ready();
    vm.view_ready();
    assert!(values.borrow().is_empty());
}

#[test]
fn test_each_configure_after_ready_emits_exactly_once() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.view_ready();
    for (i, minimum) in [5.0, 15.0, 50.0, 100.0].into_iter().enumerate() {
        vm.configure(project_us(), reward_with_minimum(i as u64, minimum));
        assert_eq!(values.borrow().len(), i + 1);
        assert_eq!(values.borrow()[i].amount, minimum);
    }
}

#[test]
fn test_repeated_ready_does_not_reemit() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.configure(project_us(), reward_with_minimum(1, 25.0));
    vm.view_ready();
    vm.view_ready();
    vm.view_ready();
    assert_eq!(values.borrow().len(), 1);
}

#[test]
fn test_repeated_ready_before_configure_counts_once() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.view_ready();
    vm.view_ready();
    vm.view_ready();
    vm.configure(project_us(), reward_with_minimum(1, 25.0));
    assert_eq!(values.borrow().len(), 1);
}

#[test]
fn test_latest_configuration_wins() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.view_ready();
    vm.configure(project_us(), reward_with_minimum(1, 1.0));
    vm.configure(project_us(), reward_with_minimum(2, 2.0));

    let values = values.borrow();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].amount, 1.0);
    assert_eq!(values[1].amount, 2.0);
}

#[test]
fn test_configure_from_subscriber_keeps_order() {
    let (_session, vm) = setup();
    let vm = Rc::new(vm);
    let seen: Rc<RefCell<Vec<(&str, f64)>>> = Rc::new(RefCell::new(Vec::new()));

    let reconfigure = Rc::downgrade(&vm);
    let first_log = seen.clone();
    let _first = vm.snapshots().observe(move |data: &PledgeViewData| {
        first_log.borrow_mut().push(("first", data.amount));
        if data.amount == 1.0 {
            if let Some(vm) = reconfigure.upgrade() {
                vm.configure(project_us(), reward_with_minimum(2, 2.0));
            }
        }
    });
    let second_log = seen.clone();
    let _second = vm
        .snapshots()
        .observe(move |data: &PledgeViewData| second_log.borrow_mut().push(("second", data.amount)));

    vm.view_ready();
    vm.configure(project_us(), reward_with_minimum(1, 1.0));

    assert_eq!(
        *seen.borrow(),
        vec![("first", 1.0), ("second", 1.0), ("first", 2.0), ("second", 2.0)]
    );
}

#[test]
fn test_burst_before_ready_coalesces() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.configure(project_us(), reward_with_minimum(1, 1.0));
    vm.configure(project_us(), reward_with_minimum(2, 2.0));
    vm.configure(project_us(), reward_with_minimum(3, 3.0));
    vm.view_ready();

    let values = values.borrow();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].amount, 3.0);
}

#[test]
fn test_authentication_is_sampled_per_emission() {
    let (session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.configure(project_us(), reward_with_minimum(1, 25.0));
    vm.view_ready();

    session.login(blob());
    assert_eq!(values.borrow().len(), 1, "login alone must not emit");

    vm.configure(project_us(), reward_with_minimum(1, 25.0));
    session.logout();
    vm.configure(project_us(), reward_with_minimum(1, 25.0));

    let flags: Vec<bool> = values.borrow().iter().map(|d| d.is_authenticated).collect();
    assert_eq!(flags, vec![false, true, false]);
}

#[test]
fn test_missing_delivery_date_is_empty_label() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    let reward = Reward {
        estimated_delivery_on: None,
        ..reward_with_minimum(1, 25.0)
    };
    vm.configure(project_us(), reward);
    vm.view_ready();

    assert_eq!(values.borrow()[0].delivery_label, "");
}

#[test]
fn test_non_us_project_labels() {
    let (_session, vm) = setup();
    let (values, _sub) = record(&vm);

    vm.view_ready();
    vm.configure(project_in("CA"), reward_with_minimum(1, 20.0));
    vm.configure(project_in("GB"), reward_with_minimum(1, 20.0));

    let values = values.borrow();
    assert_eq!(values[0].currency_label, "CA$");
    assert_eq!(
        values[0].shipping.amount.as_ref().map(|a| a.plain()).as_deref(),
        Some("+CA$7.50")
    );
    assert_eq!(values[1].currency_label, "£");
}

#[test]
fn test_unrenderable_shipping_degrades_to_none() {
    let session = Arc::new(SessionStore::new());
    let env = Environment::new(session).with_currency(Arc::new(NoCurrencies));
    let vm = PledgeViewModel::new(env);
    let (values, _sub) = record(&vm);

    vm.configure(project_us(), reward_with_minimum(1, 25.0));
    vm.view_ready();

    let values = values.borrow();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].shipping.amount, None);
    assert_eq!(values[0].shipping.location, "Brooklyn");
    assert_eq!(values[0].currency_label, "US");
}

#[test]
fn test_config_drives_shipping_and_delivery() {
    let session = Arc::new(SessionStore::new());
    let config = PledgeConfig {
        shipping_reference_amount: 12.0,
        shipping_location: "Berlin".to_string(),
        delivery_date_template: "MMMyyyy".to_string(),
        delivery_time_zone_offset_secs: -23 * 3600,
    };
    let vm = PledgeViewModel::new(Environment::new(session).with_config(config));
    let (values, _sub) = record(&vm);

    vm.configure(project_us(), reward_with_minimum(1, 25.0));
    vm.view_ready();

    let data = &values.borrow()[0];
    assert_eq!(data.shipping.location, "Berlin");
    assert_eq!(
        data.shipping.amount.as_ref().map(|a| a.plain()).as_deref(),
        Some("+$12.00")
    );
    assert_eq!(data.delivery_label, "Sep 2017");
}

#[test]
fn test_dropped_subscription_stops_delivery() {
    let (_session, vm) = setup();
    let (values, sub) = record(&vm);

    vm.view_ready();
    vm.configure(project_us(), reward_with_minimum(1, 1.0));
    drop(sub);
    vm.configure(project_us(), reward_with_minimum(2, 2.0));

    assert_eq!(values.borrow().len(), 1);
}

#[test]
fn test_multiple_subscribers_see_same_snapshot() {
    let (_session, vm) = setup();
    let (first, _a) = record(&vm);
    let (second, _b) = record(&vm);

    vm.configure(project_us(), reward_with_minimum(1, 25.0));
    vm.view_ready();

    assert_eq!(*first.borrow(), *second.borrow());
    assert_eq!(first.borrow().len(), 1);
}

#[test]
fn test_preview_helper() {
    let session = Arc::new(SessionStore::new());
    session.login(blob());

    let data = preview(
        Environment::new(session),
        project_us(),
        reward_with_minimum(1, 42.0),
    )
    .unwrap();
    assert_eq!(data.amount, 42.0);
    assert!(data.is_authenticated);
}
