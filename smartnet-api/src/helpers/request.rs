use actix_web::HttpRequest;

/// Best-effort client address: first `X-Forwarded-For` entry, then `X-Real-IP`,
/// then the socket peer.
pub fn client_ip(req: &HttpRequest) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    if let Some(forwarded) = header("x-forwarded-for") {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|ip| !ip.is_empty()) {
            return first.to_string();
        }
    }

    if let Some(real_ip) = header("x-real-ip") {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_wins() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"))
            .insert_header(("x-real-ip", "198.51.100.2"))
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_then_peer() {
        let req = TestRequest::default()
            .insert_header(("x-real-ip", "198.51.100.2"))
            .to_http_request();
        assert_eq!(client_ip(&req), "198.51.100.2");

        let req = TestRequest::default()
            .peer_addr("192.0.2.10:5555".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req), "192.0.2.10");

        let req = TestRequest::default().to_http_request();
        assert_eq!(client_ip(&req), "unknown");
    }
}
