//! Test Helpers

use rust_decimal::Decimal;
use storefront::{
    coupons::{Coupon, DiscountType},
    money::Money,
};

use crate::{
    domain::{
        addresses::{
            AddressesService, AddressesServiceError,
            models::{Address, AddressFields, AddressUuid, NewAddress},
        },
        categories::{
            CategoriesService, CategoriesServiceError,
            models::{Category, CategoryUuid, NewCategory},
        },
        coupons::{
            CouponsService, CouponsServiceError,
            models::{CouponRecord, CouponUuid, NewCoupon},
        },
        customers::{
            CustomersService, CustomersServiceError,
            models::{Customer, CustomerUuid, NewCustomer},
        },
        products::{
            ProductsService,
            models::{NewProduct, Product, ProductFields, ProductUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_category(
    ctx: &TestContext,
    name: &str,
) -> Result<Category, CategoriesServiceError> {
    ctx.categories
        .create_category(NewCategory {
            uuid: CategoryUuid::new(),
            name: name.to_string(),
            slug: None,
        })
        .await
}

pub(crate) fn product_fields(category: CategoryUuid, title: &str, price: Money) -> ProductFields {
    ProductFields {
        category_uuid: category,
        title: title.to_string(),
        slug: None,
        description: String::new(),
        sku: String::new(),
        brand: String::new(),
        price,
        compare_at_price: None,
        stock_quantity: 10,
        track_inventory: true,
        is_active: true,
        is_featured: false,
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    category: CategoryUuid,
    title: &str,
    price: &str,
) -> Result<Product, Box<dyn std::error::Error>> {
    let product = ctx
        .products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            fields: product_fields(category, title, Money::parse(price)?),
        })
        .await?;

    Ok(product)
}

async fn insert_customer(
    ctx: &TestContext,
    email: &str,
    is_staff: bool,
) -> Result<Customer, CustomersServiceError> {
    ctx.customers
        .create_customer(NewCustomer {
            uuid: CustomerUuid::new(),
            name: "Test Customer".to_string(),
            email: email.to_string(),
            phone: String::new(),
            tax_id: String::new(),
            is_staff,
        })
        .await
}

pub(crate) async fn create_customer(
    ctx: &TestContext,
    email: &str,
) -> Result<Customer, CustomersServiceError> {
    insert_customer(ctx, email, false).await
}

pub(crate) async fn create_staff(
    ctx: &TestContext,
    email: &str,
) -> Result<Customer, CustomersServiceError> {
    insert_customer(ctx, email, true).await
}

pub(crate) fn address_fields() -> AddressFields {
    AddressFields {
        label: "Casa".to_string(),
        postal_code: "01310-100".to_string(),
        street: "Avenida Paulista".to_string(),
        number: "1000".to_string(),
        complement: String::new(),
        district: "Bela Vista".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        is_default_delivery: false,
    }
}

pub(crate) async fn create_address(
    ctx: &TestContext,
    customer: CustomerUuid,
    is_default_delivery: bool,
) -> Result<Address, AddressesServiceError> {
    ctx.addresses
        .create_address(
            customer,
            NewAddress {
                uuid: AddressUuid::new(),
                fields: AddressFields {
                    is_default_delivery,
                    ..address_fields()
                },
            },
        )
        .await
}

pub(crate) fn coupon(code: &str, discount_type: DiscountType, value: Decimal) -> Coupon {
    Coupon {
        code: code.to_string(),
        discount_type,
        value,
        min_order_total: None,
        expires_at: None,
        active: true,
        used_count: 0,
        max_uses: None,
    }
}

pub(crate) async fn create_coupon(
    ctx: &TestContext,
    coupon: Coupon,
) -> Result<CouponRecord, CouponsServiceError> {
    ctx.coupons
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            coupon,
        })
        .await
}
