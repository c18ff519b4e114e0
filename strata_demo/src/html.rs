// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-file HTML gallery output.

use std::fmt::Write as _;

/// One rendered chart with a heading.
#[derive(Debug)]
pub struct Section {
    /// Heading shown above the chart.
    pub title: String,
    /// Serialized `<svg>` element.
    pub svg: String,
}

impl Section {
    /// Creates a section.
    pub fn new(title: impl Into<String>, svg: String) -> Self {
        Self {
            title: title.into(),
            svg,
        }
    }
}

/// Wraps the sections into a standalone HTML page.
pub fn page(title: &str, sections: &[Section]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\nbody {{ font-family: sans-serif; margin: 2em; }}\n\
         section {{ margin-bottom: 3em; }}\n\
         h2 {{ font-weight: 500; }}\n</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );
    for section in sections {
        let _ = write!(
            out,
            "<section>\n<h2>{}</h2>\n{}</section>\n",
            section.title, section.svg
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_embeds_every_section_in_order() {
        let sections = [
            Section::new("First", String::from("<svg>1</svg>")),
            Section::new("Second", String::from("<svg>2</svg>")),
        ];
        let html = page("Gallery", &sections);
        let first = html.find("First").unwrap();
        let second = html.find("Second").unwrap();
        assert!(first < second);
        assert!(html.contains("<svg>1</svg>"));
    }
}
