pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec![
            "Origin",
            "Access-Control-Request-Method",
            "Access-Control-Request-Headers",
            "Content-Type",
            "Authorization",
            "Accept",
            "Content-Length",
        ])
        .allow_methods(vec!["POST", "GET", "OPTIONS"])
}
