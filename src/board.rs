//! Community board crawling.
//!
//! [`BoardCrawler`] walks the list pages of a single board, keeps the posts
//! written within the last few months, and hands them to
//! [`CommentScraper`] so each post comes out as one record per comment.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Months, NaiveDate};
use scraper::Html;
use tracing::{debug, info};
use url::Url;

use crate::comments::{element_text, selector, CommentScraper};
use crate::fetcher::PageFetcher;
use crate::result::{NO_CONTENT, NO_DATE, NO_TITLE};
use crate::{Result, ReviewError, ReviewRecord};

const POST_LINK_SELECTOR: &str = ".gall_tit a:first-child";
const POST_DATE_SELECTOR: &str = ".gall_date";

/// Default number of list pages walked.
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Default age limit of collected posts, in months.
pub const DEFAULT_MONTHS_BACK: u32 = 1;

/// Source label of records produced from a board.
pub const BOARD_SOURCE: &str = "board";

/// A post entry on a board list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardPost {
    /// Title as shown in the list.
    pub title: String,
    /// Absolute post URL.
    pub link: String,
    /// Post date, `YYYY-MM-DD` with an optional time, or [`NO_DATE`].
    pub date: String,
}

impl BoardPost {
    /// Returns the calendar date of the post, if the date is readable.
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_and_remainder(&self.date, "%Y-%m-%d")
            .ok()
            .map(|(day, _)| day)
    }
}

/// Rewrites short `yy/mm/dd` list dates as `20yy-mm-dd`.
///
/// Other values are returned unchanged.
pub fn normalize_date(raw: &str) -> String {
    if raw.contains('/') {
        format!("20{}", raw.replace('/', "-"))
    } else {
        raw.to_string()
    }
}

/// Extracts post entries from a board list page.
///
/// Links are resolved against `base`. The n-th date cell belongs to the n-th
/// link; the date comes from the cell's `title` attribute, then its text.
pub fn list_posts(html: &str, base: &Url) -> Result<Vec<BoardPost>> {
    let document = Html::parse_document(html);
    let link_selector = selector(POST_LINK_SELECTOR)?;
    let date_selector = selector(POST_DATE_SELECTOR)?;

    let dates: Vec<String> = document
        .select(&date_selector)
        .map(|cell| {
            cell.value()
                .attr("title")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .or_else(|| element_text(cell))
                .unwrap_or_else(|| NO_DATE.to_string())
        })
        .collect();

    let mut posts = Vec::new();
    for (index, anchor) in document.select(&link_selector).enumerate() {
        let Some(link) = anchor.value().attr("href").and_then(|h| base.join(h).ok()) else {
            continue;
        };
        posts.push(BoardPost {
            title: element_text(anchor).unwrap_or_else(|| NO_TITLE.to_string()),
            link: link.to_string(),
            date: dates
                .get(index)
                .map(|d| normalize_date(d))
                .unwrap_or_else(|| NO_DATE.to_string()),
        });
    }

    Ok(posts)
}

/// Collects recent posts from one board and expands them into review records.
pub struct BoardCrawler {
    fetcher: Arc<dyn PageFetcher>,
    board_url: Url,
    max_pages: u32,
    months_back: u32,
}

impl BoardCrawler {
    /// Creates a crawler for the board list at `board_url`.
    pub fn new<F: PageFetcher + 'static>(fetcher: F, board_url: &str) -> Result<Self> {
        let board_url = Url::parse(board_url).map_err(|e| {
            ReviewError::Configuration(format!("invalid board URL {}: {}", board_url, e))
        })?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            board_url,
            max_pages: DEFAULT_MAX_PAGES,
            months_back: DEFAULT_MONTHS_BACK,
        })
    }

    /// Sets the number of list pages to walk.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Sets how many months back posts are kept.
    pub fn with_months_back(mut self, months_back: u32) -> Self {
        self.months_back = months_back;
        self
    }

    /// Host of the board, used as the record site.
    pub fn host(&self) -> &str {
        self.board_url.host_str().unwrap_or_default()
    }

    /// URL of list page `page` (1-based).
    pub fn page_url(&self, page: u32) -> String {
        let mut url = self.board_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url.to_string()
    }

    /// Oldest post date kept when crawling on `today`.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.months_back))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Returns true if `post` is on the board's own site and not older than
    /// `cutoff`. Posts with an unreadable date are rejected.
    pub fn accepts(&self, post: &BoardPost, cutoff: NaiveDate) -> bool {
        let same_origin = Url::parse(&post.link)
            .map(|link| link.origin() == self.board_url.origin())
            .unwrap_or(false);
        same_origin && post.day().is_some_and(|day| day >= cutoff)
    }

    /// Walks the list pages and returns the accepted posts in list order.
    ///
    /// A post listed on several pages is kept once. A failed page fetch
    /// aborts the walk.
    pub async fn collect_posts(&self, today: NaiveDate) -> Result<Vec<BoardPost>> {
        let cutoff = self.cutoff(today);
        info!("Collecting posts since {} from {}", cutoff, self.board_url);

        let mut seen = HashSet::new();
        let mut posts = Vec::new();
        for page in 1..=self.max_pages {
            let url = self.page_url(page);
            let html = self.fetcher.fetch(&url).await?;
            let listed = list_posts(&html, &self.board_url)?;
            debug!("Page {} lists {} posts", page, listed.len());

            for post in listed {
                if self.accepts(&post, cutoff) && seen.insert(post.link.clone()) {
                    posts.push(post);
                }
            }
        }

        info!("Accepted posts: {}", posts.len());
        Ok(posts)
    }

    /// Collects recent posts and returns one record per comment.
    ///
    /// A post without comments yields a single record with no comment.
    pub async fn crawl(&self, today: NaiveDate) -> Result<Vec<ReviewRecord>> {
        let records = self
            .collect_posts(today)
            .await?
            .into_iter()
            .map(|post| self.record(post))
            .collect();

        Ok(CommentScraper::with_fetcher(self.fetcher.clone())
            .enrich(records)
            .await)
    }

    fn record(&self, post: BoardPost) -> ReviewRecord {
        ReviewRecord {
            url: post.link,
            date: post.date,
            title: post.title,
            content: NO_CONTENT.to_string(),
            comment: None,
            source: BOARD_SOURCE.to_string(),
            keyword: String::new(),
            site: self.host().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    const BOARD: &str = "https://gall.dcinside.com/board/lists/?id=wow_new3";

    const LIST_PAGE_1: &str = r##"
    <table class="gall_list"><tbody>
      <tr class="ub-content">
        <td class="gall_tit"><a href="/board/view/?id=wow_new3&amp;no=300">신규 던전 후기</a><a class="reply_numbox" href="#">[2]</a></td>
        <td class="gall_date" title="2025-02-20 13:01:02">02.20</td>
      </tr>
      <tr class="ub-content">
        <td class="gall_tit"><a href="/board/view/?id=wow_new3&amp;no=299">직업 추천좀</a></td>
        <td class="gall_date">25/01/10</td>
      </tr>
      <tr class="ub-content">
        <td class="gall_tit"><a href="https://ad.example.com/promo">광고</a></td>
        <td class="gall_date" title="2025-02-23 09:00:00">02.23</td>
      </tr>
    </tbody></table>
    "##;

    const LIST_PAGE_2: &str = r#"
    <table class="gall_list"><tbody>
      <tr class="ub-content">
        <td class="gall_tit"><a href="/board/view/?id=wow_new3&amp;no=300">신규 던전 후기</a></td>
        <td class="gall_date" title="2025-02-20 13:01:02">02.20</td>
      </tr>
      <tr class="ub-content">
        <td class="gall_tit"><a href="/board/view/?id=wow_new3&amp;no=250">오늘 점검</a></td>
        <td class="gall_date">13:45</td>
      </tr>
    </tbody></table>
    "#;

    const POST_300: &str = r#"
    <span class="title_subject">신규 던전 후기</span>
    <div class="write_div">난이도 적당함</div>
    <div class="comment_box"><p class="usertxt">ㄹㅇ</p><p class="usertxt">보상이 아쉽</p></div>
    "#;

    struct MockFetcher {
        pages: HashMap<String, String>,
    }

    impl MockFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, h)| (u.to_string(), h.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages.get(url).cloned().ok_or_else(|| ReviewError::Status {
                service: "page fetch",
                status: 404,
                body: String::new(),
            })
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 24).unwrap()
    }

    fn post(link: &str, date: &str) -> BoardPost {
        BoardPost {
            title: "t".to_string(),
            link: link.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("25/01/10"), "2025-01-10");
        assert_eq!(normalize_date("2025-02-20 13:01:02"), "2025-02-20 13:01:02");
        assert_eq!(normalize_date("13:45"), "13:45");
    }

    #[test]
    fn test_board_post_day() {
        let day = post("x", "2025-02-20 13:01:02").day();
        assert_eq!(day, NaiveDate::from_ymd_opt(2025, 2, 20));
        assert_eq!(post("x", "2025-01-10").day(), NaiveDate::from_ymd_opt(2025, 1, 10));
        assert!(post("x", "13:45").day().is_none());
        assert!(post("x", "날짜 없음").day().is_none());
    }

    #[test]
    fn test_list_posts() {
        let base = Url::parse(BOARD).unwrap();
        let posts = list_posts(LIST_PAGE_1, &base).unwrap();

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].title, "신규 던전 후기");
        assert_eq!(
            posts[0].link,
            "https://gall.dcinside.com/board/view/?id=wow_new3&no=300"
        );
        assert_eq!(posts[0].date, "2025-02-20 13:01:02");
        assert_eq!(posts[1].date, "2025-01-10");
        assert_eq!(posts[2].link, "https://ad.example.com/promo");
    }

    #[test]
    fn test_list_posts_missing_date_cell() {
        let base = Url::parse(BOARD).unwrap();
        let html = r#"<table><tr><td class="gall_tit"><a href="/board/view/?no=1">제목</a></td></tr></table>"#;
        let posts = list_posts(html, &base).unwrap();
        assert_eq!(posts[0].date, "날짜 없음");
    }

    #[test]
    fn test_page_url() {
        let crawler = BoardCrawler::new(MockFetcher::new(&[]), BOARD).unwrap();
        assert_eq!(crawler.page_url(2), format!("{}&page=2", BOARD));
        assert_eq!(crawler.host(), "gall.dcinside.com");
    }

    #[test]
    fn test_board_crawler_invalid_url() {
        let result = BoardCrawler::new(MockFetcher::new(&[]), "not a url");
        assert!(matches!(result, Err(ReviewError::Configuration(_))));
    }

    #[test]
    fn test_window_cutoff() {
        let crawler = BoardCrawler::new(MockFetcher::new(&[]), BOARD).unwrap();
        let cutoff = crawler.cutoff(today());
        assert_eq!(cutoff, NaiveDate::from_ymd_opt(2025, 1, 24).unwrap());

        let link = "https://gall.dcinside.com/board/view/?no=1";
        assert!(crawler.accepts(&post(link, "2025-01-24"), cutoff));
        assert!(crawler.accepts(&post(link, "2025-02-24 08:00:00"), cutoff));
        assert!(!crawler.accepts(&post(link, "2025-01-23 23:59:59"), cutoff));
        assert!(!crawler.accepts(&post(link, "13:45"), cutoff));
    }

    #[test]
    fn test_window_cutoff_months_back() {
        let crawler = BoardCrawler::new(MockFetcher::new(&[]), BOARD)
            .unwrap()
            .with_months_back(3);
        assert_eq!(
            crawler.cutoff(today()),
            NaiveDate::from_ymd_opt(2024, 11, 24).unwrap()
        );
    }

    #[test]
    fn test_accepts_rejects_other_hosts() {
        let crawler = BoardCrawler::new(MockFetcher::new(&[]), BOARD).unwrap();
        let cutoff = crawler.cutoff(today());
        assert!(!crawler.accepts(&post("https://ad.example.com/promo", "2025-02-23"), cutoff));
        assert!(!crawler.accepts(&post("http://gall.dcinside.com/board/view/?no=1", "2025-02-23"), cutoff));
    }

    #[tokio::test]
    async fn test_collect_posts_walks_pages() {
        let page_1 = format!("{}&page=1", BOARD);
        let page_2 = format!("{}&page=2", BOARD);
        let crawler = BoardCrawler::new(
            MockFetcher::new(&[(&page_1, LIST_PAGE_1), (&page_2, LIST_PAGE_2)]),
            BOARD,
        )
        .unwrap()
        .with_max_pages(2);

        let posts = crawler.collect_posts(today()).await.unwrap();

        let links: Vec<&str> = posts.iter().map(|p| p.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://gall.dcinside.com/board/view/?id=wow_new3&no=300"]
        );
    }

    #[tokio::test]
    async fn test_collect_posts_longer_window() {
        let page_1 = format!("{}&page=1", BOARD);
        let crawler = BoardCrawler::new(MockFetcher::new(&[(&page_1, LIST_PAGE_1)]), BOARD)
            .unwrap()
            .with_max_pages(1)
            .with_months_back(2);

        let posts = crawler.collect_posts(today()).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].date, "2025-01-10");
    }

    #[tokio::test]
    async fn test_collect_posts_page_failure() {
        let page_1 = format!("{}&page=1", BOARD);
        let crawler = BoardCrawler::new(MockFetcher::new(&[(&page_1, LIST_PAGE_1)]), BOARD)
            .unwrap()
            .with_max_pages(2);

        let result = crawler.collect_posts(today()).await;
        assert!(matches!(result, Err(ReviewError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_crawl_fans_out_comments() {
        let page_1 = format!("{}&page=1", BOARD);
        let crawler = BoardCrawler::new(
            MockFetcher::new(&[
                (&page_1, LIST_PAGE_1),
                ("https://gall.dcinside.com/board/view/?id=wow_new3&no=300", POST_300),
            ]),
            BOARD,
        )
        .unwrap()
        .with_max_pages(1);

        let records = crawler.crawl(today()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].comment.as_deref(), Some("ㄹㅇ"));
        assert_eq!(records[1].comment.as_deref(), Some("보상이 아쉽"));
        for record in &records {
            assert_eq!(record.content, "난이도 적당함");
            assert_eq!(record.date, "2025-02-20 13:01:02");
            assert_eq!(record.source, "board");
            assert_eq!(record.site, "gall.dcinside.com");
        }
    }

    #[tokio::test]
    async fn test_crawl_post_without_comments() {
        let page_1 = format!("{}&page=1", BOARD);
        let crawler = BoardCrawler::new(
            MockFetcher::new(&[
                (&page_1, LIST_PAGE_1),
                (
                    "https://gall.dcinside.com/board/view/?id=wow_new3&no=300",
                    r#"<div class="write_div">본문만</div>"#,
                ),
            ]),
            BOARD,
        )
        .unwrap()
        .with_max_pages(1);

        let records = crawler.crawl(today()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "본문만");
        assert!(records[0].comment.is_none());
    }
}
