//! Response headers shared by the REST resources: alert headers that a
//! front-end can surface to users, and RFC 5988 pagination links.

use axum::http::{
    header::LINK,
    HeaderMap, HeaderName, HeaderValue,
};

use crate::model::Page;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => log::warn!("Skipping invalid response header {}: {}", name, value),
    }
}

pub fn alert(application_name: &str, message: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, &format!("X-{}-alert", application_name), message);
    insert(&mut headers, &format!("X-{}-params", application_name), param);
    headers
}

pub fn entity_creation_alert(application_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    let message = format!("A new {} is created with identifier {}", entity_name, param);
    alert(application_name, &message, param)
}

pub fn entity_update_alert(application_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    let message = format!("A {} is updated with identifier {}", entity_name, param);
    alert(application_name, &message, param)
}

pub fn entity_deletion_alert(application_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    let message = format!("A {} is deleted with identifier {}", entity_name, param);
    alert(application_name, &message, param)
}

pub fn failure_alert(application_name: &str, entity_name: &str, error_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(
        &mut headers,
        &format!("X-{}-error", application_name),
        &format!("error.{}", error_key),
    );
    insert(&mut headers, &format!("X-{}-params", application_name), entity_name);
    headers
}

/// Query segments other than `page` and `size`, kept exactly as the client
/// sent them.
fn retained_query(query: Option<&str>) -> Vec<&str> {
    query
        .unwrap_or_default()
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| {
            let key = form_urlencoded::parse(segment.as_bytes())
                .next()
                .map(|(key, _)| key.into_owned())
                .unwrap_or_default();
            key != "page" && key != "size"
        })
        .collect()
}

fn page_link(path: &str, retained: &[&str], page: u64, size: u64, rel: &str) -> String {
    let mut uri = format!("{}?page={}&size={}", path, page, size);
    for segment in retained {
        uri.push('&');
        uri.push_str(segment);
    }
    format!("<{}>; rel=\"{}\"", uri, rel)
}

/// `X-Total-Count` plus a `Link` header with next/prev/last/first relations.
/// Links reuse the request query with `page` and `size` replaced.
pub fn pagination<T>(path: &str, query: Option<&str>, page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, TOTAL_COUNT_HEADER, &page.total_elements.to_string());

    let retained = retained_query(query);
    let total_pages = page.total_pages();
    let last_page = total_pages.saturating_sub(1);

    let mut links = Vec::new();
    if page.page < last_page {
        links.push(page_link(path, &retained, page.page + 1, page.size, "next"));
    }
    if page.page > 0 {
        links.push(page_link(path, &retained, page.page - 1, page.size, "prev"));
    }
    links.push(page_link(path, &retained, last_page, page.size, "last"));
    links.push(page_link(path, &retained, 0, page.size, "first"));

    insert(&mut headers, LINK.as_str(), &links.join(","));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageRequest;

    #[test]
    fn test_entity_alerts() {
        let headers = entity_creation_alert("instrumentApp", "instrument", "7");
        assert_eq!(
            headers["x-instrumentapp-alert"],
            "A new instrument is created with identifier 7"
        );
        assert_eq!(headers["x-instrumentapp-params"], "7");

        let headers = entity_update_alert("instrumentApp", "instrument", "7");
        assert_eq!(
            headers["x-instrumentapp-alert"],
            "A instrument is updated with identifier 7"
        );

        let headers = entity_deletion_alert("instrumentApp", "instrument", "7");
        assert_eq!(
            headers["x-instrumentapp-alert"],
            "A instrument is deleted with identifier 7"
        );
    }

    #[test]
    fn test_failure_alert() {
        let headers = failure_alert("instrumentApp", "instrument", "idexists");
        assert_eq!(headers["x-instrumentapp-error"], "error.idexists");
        assert_eq!(headers["x-instrumentapp-params"], "instrument");
    }

    #[test]
    fn test_invalid_application_name_is_skipped() {
        let headers = alert("bad name", "msg", "1");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_pagination_middle_page() {
        let request = PageRequest::new(1, 10);
        let page: Page<u8> = Page::new(vec![0; 10], &request, 35);

        let headers = pagination("/api/instruments", Some("page=1&size=10&sort=id,desc"), &page);

        assert_eq!(headers[TOTAL_COUNT_HEADER], "35");
        assert_eq!(
            headers[LINK],
            "</api/instruments?page=2&size=10&sort=id,desc>; rel=\"next\",\
             </api/instruments?page=0&size=10&sort=id,desc>; rel=\"prev\",\
             </api/instruments?page=3&size=10&sort=id,desc>; rel=\"last\",\
             </api/instruments?page=0&size=10&sort=id,desc>; rel=\"first\""
        );
    }

    #[test]
    fn test_pagination_empty_result() {
        let request = PageRequest::new(0, 20);
        let page: Page<u8> = Page::new(Vec::new(), &request, 0);

        let headers = pagination("/api/instruments", None, &page);

        assert_eq!(headers[TOTAL_COUNT_HEADER], "0");
        assert_eq!(
            headers[LINK],
            "</api/instruments?page=0&size=20>; rel=\"last\",</api/instruments?page=0&size=20>; rel=\"first\""
        );
    }

    #[test]
    fn test_pagination_keeps_other_query_parameters() {
        let request = PageRequest::new(0, 2);
        let page: Page<u8> = Page::new(vec![0; 2], &request, 4);

        let headers = pagination(
            "/api/instruments",
            Some("sort=name,asc&size=2&sort=id&name.contains=vi%20ola"),
            &page,
        );

        assert_eq!(
            headers[LINK],
            "</api/instruments?page=1&size=2&sort=name,asc&sort=id&name.contains=vi%20ola>; rel=\"next\",\
             </api/instruments?page=1&size=2&sort=name,asc&sort=id&name.contains=vi%20ola>; rel=\"last\",\
             </api/instruments?page=0&size=2&sort=name,asc&sort=id&name.contains=vi%20ola>; rel=\"first\""
        );
    }

    #[test]
    fn test_pagination_beyond_last_page_does_not_overflow() {
        let request = PageRequest::new(u64::MAX, 20);
        let page: Page<u8> = Page::new(Vec::new(), &request, 3);

        let headers = pagination("/api/instruments", Some("page=18446744073709551615"), &page);

        let link = headers[LINK].to_str().unwrap();
        assert!(!link.contains("rel=\"next\""));
        assert!(link.contains(&format!("page={}&size=20>; rel=\"prev\"", u64::MAX - 1)));
        assert!(link.contains("</api/instruments?page=0&size=20>; rel=\"last\""));
    }
}
