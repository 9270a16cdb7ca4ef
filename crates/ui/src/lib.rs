pub fn module_ready() -> bool {
    true
}

pub fn landing_page() -> &'static str {
    include_str!("../static/index.html")
}

pub fn dashboard_page() -> &'static str {
    include_str!("../static/dashboard.html")
}

pub fn trading_page() -> &'static str {
    include_str!("../static/trading.html")
}

pub fn stylesheet() -> &'static str {
    include_str!("../static/styles.css")
}

pub fn dashboard_script() -> &'static str {
    include_str!("../static/dashboard.js")
}

pub fn trading_script() -> &'static str {
    include_str!("../static/trading.js")
}
