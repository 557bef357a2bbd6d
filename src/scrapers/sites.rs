//! The supported AI safety organizations.
//!
//! Pure data: every entry is interpreted by the shared engine in the parent
//! module. Selector hints and link patterns were taken from each site's
//! markup as observed at the time of writing and will need occasional
//! refreshing as sites redesign.

use super::{FollowRules, Pagination, Section, SiteConfig};
use crate::extract::ExtractHints;
use crate::models::ContentType;

pub const REGISTRY: &[SiteConfig] = &[
    SiteConfig {
        name: "metr.org",
        matchers: &["metr.org", "metr.com"],
        base_url: "https://metr.org",
        hints: ExtractHints {
            content_selectors: &["div.content", "main", "article"],
            title_selector: Some("h1"),
            skip_classes: &[
                "post-header",
                "post-categories",
                "post-authors",
                "post-date",
                "caption",
                "hide-over-950",
                "show-over-950",
                "breakout-wider",
            ],
        },
        sections: &[
            Section {
                path: "/",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/blog",
                content_type: ContentType::Blog,
                follow: Some(FollowRules {
                    include: &["/blog/"],
                    exclude: &["/page/", "/blog/?", "/blog/#"],
                    pagination: Pagination::None,
                }),
            },
        ],
    },
    SiteConfig {
        name: "aisi.gov.uk",
        matchers: &["aisi.gov.uk"],
        base_url: "https://www.aisi.gov.uk",
        hints: ExtractHints {
            content_selectors: &["main", "div.main-content", "div.rtf-cms"],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/work",
                content_type: ContentType::Publication,
                follow: Some(FollowRules {
                    include: &["/work/"],
                    exclude: &["/work/?", "/work/#"],
                    pagination: Pagination::None,
                }),
            },
        ],
    },
    SiteConfig {
        name: "lakera.ai",
        matchers: &["lakera.ai"],
        base_url: "https://www.lakera.ai",
        hints: ExtractHints {
            content_selectors: &["div.text-rich-text", "article", "main"],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/blog",
                content_type: ContentType::Blog,
                follow: Some(FollowRules {
                    include: &["/blog/"],
                    exclude: &["/category/", "/author/"],
                    pagination: Pagination::Numbered {
                        param: "665a46a9_page",
                    },
                }),
            },
        ],
    },
    SiteConfig {
        name: "nist.gov",
        matchers: &["nist.gov"],
        base_url: "https://www.nist.gov/aisi",
        hints: ExtractHints {
            content_selectors: &[
                "section.nist-page__content",
                "div.text-with-summary",
                "main",
            ],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/aisi",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/aisi/news",
                content_type: ContentType::News,
                follow: Some(FollowRules {
                    include: &["/news/", "/updates/", "/news-events/"],
                    exclude: &["?page="],
                    pagination: Pagination::None,
                }),
            },
        ],
    },
    SiteConfig {
        name: "ised-isde.canada.ca",
        matchers: &["ised-isde.canada.ca", "canada.ca"],
        base_url: "https://ised-isde.canada.ca",
        hints: ExtractHints {
            content_selectors: &[
                "main",
                "div.mwsgeneric-base-html",
                "article",
                "div.field-item",
            ],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/site/ised/en/canadian-artificial-intelligence-safety-institute",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/site/ised/en/canadian-artificial-intelligence-safety-institute/about-us",
                content_type: ContentType::About,
                follow: None,
            },
        ],
    },
    SiteConfig {
        name: "apolloresearch.ai",
        matchers: &["apolloresearch.ai"],
        base_url: "https://www.apolloresearch.ai",
        hints: ExtractHints {
            content_selectors: &["main", "article"],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/research",
                content_type: ContentType::Publication,
                follow: Some(FollowRules {
                    include: &["/research/"],
                    exclude: &["/research/?", "/research/#"],
                    pagination: Pagination::None,
                }),
            },
            Section {
                path: "/blog",
                content_type: ContentType::Blog,
                follow: Some(FollowRules {
                    include: &["/blog/"],
                    exclude: &["/blog/?", "/blog/#"],
                    pagination: Pagination::None,
                }),
            },
        ],
    },
    SiteConfig {
        name: "anthropic.com",
        matchers: &["anthropic.com"],
        base_url: "https://www.anthropic.com",
        hints: ExtractHints {
            content_selectors: &["main", "article"],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/research",
                content_type: ContentType::Publication,
                follow: Some(FollowRules {
                    include: &["/research/"],
                    exclude: &["/research/?", "/research/#"],
                    pagination: Pagination::None,
                }),
            },
            Section {
                path: "/news",
                content_type: ContentType::News,
                follow: Some(FollowRules {
                    include: &["/news/"],
                    exclude: &["/news/?", "/news/#"],
                    pagination: Pagination::None,
                }),
            },
        ],
    },
    SiteConfig {
        name: "deepmind.google",
        matchers: &["deepmind.google", "deepmind.com"],
        base_url: "https://deepmind.google",
        hints: ExtractHints {
            content_selectors: &["main", "article"],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/research/publications/",
                content_type: ContentType::Publication,
                follow: Some(FollowRules {
                    include: &["/research/publications/"],
                    exclude: &["?page="],
                    pagination: Pagination::Numbered { param: "page" },
                }),
            },
        ],
    },
    SiteConfig {
        name: "cser.ac.uk",
        matchers: &["cser.ac.uk", "cser.org"],
        base_url: "https://www.cser.ac.uk",
        hints: ExtractHints {
            content_selectors: &["main", "article", "div.content"],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/resources/",
                content_type: ContentType::Publication,
                follow: Some(FollowRules {
                    include: &["/resources/"],
                    exclude: &["/resources/?", "/resources/#"],
                    pagination: Pagination::None,
                }),
            },
        ],
    },
    SiteConfig {
        name: "humancompatible.ai",
        matchers: &["humancompatible.ai", "chai.berkeley"],
        base_url: "https://humancompatible.ai",
        hints: ExtractHints {
            content_selectors: &["main", "div.content", "body"],
            title_selector: Some("h1"),
            skip_classes: &[],
        },
        sections: &[
            Section {
                path: "/about/",
                content_type: ContentType::About,
                follow: None,
            },
            Section {
                path: "/people/",
                content_type: ContentType::Team,
                follow: None,
            },
        ],
    },
];
