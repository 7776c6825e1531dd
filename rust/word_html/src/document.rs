use crate::profile::{ProfileConfig, RESET_STYLESHEET};

pub fn assemble(body: &str, config: &ProfileConfig) -> String {
    let mut out = String::with_capacity(
        body.len() + config.stylesheet.len() + config.head_meta.len() + 256,
    );
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(config.html_open);
    out.push_str("\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(config.head_meta);
    out.push_str("<style>\n");
    out.push_str(config.stylesheet);
    out.push_str(RESET_STYLESHEET);
    out.push_str("</style>\n</head>\n<body>");
    out.push_str(body);
    out.push_str("</body>\n</html>\n");
    out
}

pub fn body_region(document: &str) -> Option<&str> {
    let start = document.find("<body>")? + "<body>".len();
    let end = document.rfind("</body>")?;
    document.get(start..end)
}
