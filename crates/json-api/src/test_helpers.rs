//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront::{money::Money, order_numbers::OrderNumber, totals::Quantity};
use storefront_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        addresses::{
            MockAddressesService,
            models::{Address, AddressFields, AddressUuid},
        },
        categories::{
            MockCategoriesService,
            models::{Category, CategoryUuid},
        },
        coupons::MockCouponsService,
        customers::{
            MockCustomersService,
            models::{Customer, CustomerUuid},
        },
        order_statuses::MockOrderStatusesService,
        orders::{
            MockOrdersService,
            models::{Order, OrderItem, OrderItemUuid, OrderUuid, ShippingDetails},
        },
        products::{
            MockProductsService,
            models::{Product, ProductUuid},
        },
        site_settings::MockSiteSettingsService,
    },
    settings::StoreSettings,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER_UUID: CustomerUuid = CustomerUuid::from_uuid(Uuid::nil());

/// An app context whose services reject every call. Tests swap in the mock they exercise.
pub(crate) fn mock_app() -> AppContext {
    AppContext {
        categories: Arc::new(MockCategoriesService::new()),
        products: Arc::new(MockProductsService::new()),
        customers: Arc::new(MockCustomersService::new()),
        addresses: Arc::new(MockAddressesService::new()),
        order_statuses: Arc::new(MockOrderStatusesService::new()),
        coupons: Arc::new(MockCouponsService::new()),
        orders: Arc::new(MockOrdersService::new()),
        site_settings: Arc::new(MockSiteSettingsService::new()),
        auth: Arc::new(MockAuthService::new()),
        settings: StoreSettings::default(),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    let mut app = mock_app();

    app.auth = Arc::new(auth);

    State::from_app_context(app)
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        customer_uuid: TEST_CUSTOMER_UUID,
        is_staff: false,
    });
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_staff(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        customer_uuid: TEST_CUSTOMER_UUID,
        is_staff: true,
    });
    ctrl.call_next(req, depot, res).await;
}

/// A service with no authenticated caller.
pub(crate) fn public_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .push(route),
    )
}

/// A service authenticated as [`TEST_CUSTOMER_UUID`].
pub(crate) fn customer_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .hoop(inject_customer)
            .push(route),
    )
}

/// A service authenticated as a staff member.
pub(crate) fn staff_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .hoop(inject_staff)
            .push(route),
    )
}

pub(crate) fn storage_error() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}

pub(crate) fn money(amount: &str) -> Money {
    Money::parse(amount).unwrap_or(Money::ZERO)
}

pub(crate) fn make_category(uuid: CategoryUuid) -> Category {
    Category {
        uuid,
        name: "Mugs".to_string(),
        slug: "mugs".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> Product {
    Product {
        uuid,
        category_uuid: CategoryUuid::from_uuid(Uuid::nil()),
        title: "Blue Mug".to_string(),
        slug: "blue-mug".to_string(),
        description: String::new(),
        sku: "MUG-BLUE".to_string(),
        brand: String::new(),
        price: money("19.99"),
        compare_at_price: None,
        stock_quantity: 5,
        track_inventory: true,
        is_active: true,
        is_featured: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_customer(uuid: CustomerUuid) -> Customer {
    Customer {
        uuid,
        name: "Ana Souza".to_string(),
        email: "ana@example.com".to_string(),
        phone: String::new(),
        tax_id: String::new(),
        is_staff: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address(uuid: AddressUuid) -> Address {
    Address {
        uuid,
        customer_uuid: TEST_CUSTOMER_UUID,
        fields: AddressFields {
            label: "Casa".to_string(),
            postal_code: "01310-100".to_string(),
            street: "Avenida Paulista".to_string(),
            number: "1000".to_string(),
            complement: String::new(),
            district: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            is_default_delivery: true,
        },
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid) -> Order {
    Order {
        uuid,
        customer_uuid: TEST_CUSTOMER_UUID,
        order_number: "PED-250314-0042"
            .parse::<OrderNumber>()
            .unwrap_or_else(|_| unreachable!("fixture order number is well formed")),
        status: "pending".to_string(),
        total: money("59.97"),
        shipping: ShippingDetails {
            recipient_name: "Ana Souza".to_string(),
            ..ShippingDetails::default()
        },
        items: vec![OrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: None,
            title: "Blue Mug".to_string(),
            image_url: None,
            unit_price: money("19.99"),
            quantity: Quantity::coerce(Some(3)),
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
