//! HTTP span helpers.

use storefront::order_numbers::OrderNumber;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Replace identifiers in `path` with placeholders so spans and metric labels stay bounded.
fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");
    let mut previous: Option<&str> = None;
    let mut admin = false;

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if index == 0 && segment == "admin" {
            admin = true;
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else if segment.parse::<OrderNumber>().is_ok() {
            normalised.push_str("{order_number}");
        } else if !admin && previous == Some("products") {
            normalised.push_str("{slug}");
        } else {
            normalised.push_str(segment);
        }

        previous = Some(segment);
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_replaced_with_placeholders() {
        let cases = [
            ("/", "/"),
            ("/healthcheck", "/healthcheck"),
            (
                "/orders/0190a3c4-5b6d-7e8f-9a0b-1c2d3e4f5a6b",
                "/orders/{uuid}",
            ),
            (
                "/admin/orders/by-number/PED-250314-0042",
                "/admin/orders/by-number/{order_number}",
            ),
            ("/products/blue-mug", "/products/{slug}"),
            (
                "/admin/products/0190a3c4-5b6d-7e8f-9a0b-1c2d3e4f5a6b",
                "/admin/products/{uuid}",
            ),
        ];

        for (path, expected) in cases {
            assert_eq!(normalise_path_for_span_name(path), expected, "path {path}");
        }
    }

    #[test]
    fn span_name_combines_method_and_path() {
        let names = request_span_name("GET", "/products/blue-mug");

        assert_eq!(names.otel_span_name, "GET /products/{slug}");
    }
}
