//! End-to-end pipeline scenarios.

#[cfg(test)]
mod tests {
    use crate::config::{EndpointConfig, SearchConfig};
    use crate::core::{Category, PipelineState};
    use crate::errors::{FailureKind, EMPTY_KEYWORD_MESSAGE};
    use crate::filter::KeywordSet;
    use crate::fetch::{MockPageTransport, RawResponse};
    use crate::observability::SearchObserver;
    use crate::pipeline::{DateRange, SearchOutcome, SearchPipeline, SearchRequest, FAILURE_STATUS};
    use crate::projection::BUDGET_AMOUNT_FIELD;
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn range() -> DateRange {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap().and_hms_opt(23, 59, 0).unwrap();
        DateRange::new(start, end)
    }

    fn request(category: Category, keywords: &str) -> SearchRequest {
        SearchRequest::new(category, keywords, range(), "test%2Bkey%3D%3D").unwrap()
    }

    fn envelope(items: Value, total: u64) -> String {
        json!({
            "response": {
                "header": {"resultCode": "00", "resultMsg": "정상"},
                "body": {"items": items, "totalCount": total, "numOfRows": 999, "pageNo": 1}
            }
        })
        .to_string()
    }

    fn notice(no: usize, title: &str) -> Value {
        json!({
            "bidNtceNo": format!("R25BK{no:08}"),
            "bidNtceNm": title,
            "ntceInsttNm": "경기도 의왕시",
            "asignBdgtAmt": "150000000",
            "bidNtceDtlUrl": format!("https://www.g2b.go.kr/link?bidno={no}"),
        })
    }

    fn page_no(url: &reqwest::Url) -> u32 {
        url.query_pairs()
            .find(|(k, _)| k == "pageNo")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap()
    }

    fn pipeline(transport: MockPageTransport) -> SearchPipeline {
        SearchPipeline::with_transport(SearchConfig::default(), Arc::new(transport))
    }

    #[derive(Default)]
    struct StateLog {
        states: Mutex<Vec<PipelineState>>,
        pages: AtomicU32,
    }

    impl SearchObserver for StateLog {
        fn on_run_start(&self, _: &str, _: &str, _: &[String]) {}
        fn on_page_fetched(&self, _: &str, _: u32, _: usize, _: usize, _: u64) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }
        fn on_state_change(&self, _: &str, _: PipelineState, to: PipelineState) {
            self.states.lock().push(to);
        }
        fn on_run_complete(&self, _: &str, _: PipelineState, _: usize, _: f64) {}
    }

    #[tokio::test]
    async fn test_two_pages_aggregate_1200_records() {
        let mut transport = MockPageTransport::new();
        transport.expect_get().times(2).returning(|url| {
            let (ids, total) = match page_no(url) {
                1 => (0..999, 1200),
                2 => (999..1200, 1200),
                n => panic!("page {n} must not be requested"),
            };
            let items: Vec<_> = ids.map(|i| notice(i, "철도 축제 운영 용역")).collect();
            Ok(RawResponse::ok(envelope(Value::Array(items), total)))
        });

        let outcome = pipeline(transport).run(&request(Category::BidNotice, "축제")).await;
        let results = outcome.into_result().unwrap();

        assert_eq!(results.fetched, 1200);
        assert_eq!(results.matched, 1200);
        assert_eq!(results.pages_fetched, 2);
        assert_eq!(results.display.len(), 1200);
        assert_eq!(results.export.len(), 1200);
        assert_eq!(results.status, "[입찰공고] 검색 완료: 1200건이 검색되었습니다.");
    }

    #[tokio::test]
    async fn test_single_object_items_yield_one_row() {
        let mut transport = MockPageTransport::new();
        transport.expect_get().times(1).returning(|_| {
            Ok(RawResponse::ok(envelope(notice(1, "의왕 어린이 철도 축제"), 1)))
        });

        let results = pipeline(transport)
            .run(&request(Category::BidNotice, "축제"))
            .await
            .into_result()
            .unwrap();
        assert_eq!(results.fetched, 1);
        assert_eq!(results.display.len(), 1);
    }

    #[tokio::test]
    async fn test_refinements_filter_client_side() {
        let mut transport = MockPageTransport::new();
        transport.expect_get().times(1).returning(|url| {
            let keyword = url
                .query_pairs()
                .find(|(k, _)| k == "bidNtceNm")
                .map(|(_, v)| v.into_owned());
            assert_eq!(keyword.as_deref(), Some("어린이"));
            let items = json!([notice(1, "의왕 어린이 철도 축제"), notice(2, "어린이 도서관")]);
            Ok(RawResponse::ok(envelope(items, 2)))
        });

        let results = pipeline(transport)
            .run(&request(Category::BidNotice, "어린이, 철도"))
            .await
            .into_result()
            .unwrap();

        assert_eq!(results.fetched, 2);
        assert_eq!(results.matched, 1);
        let display = results.display.table();
        assert_eq!(display.cell(0, "bidNtceNm"), Some("의왕 어린이 철도 축제"));
        assert_eq!(display.cell(0, BUDGET_AMOUNT_FIELD), Some("1억 5,000만원"));
        assert_eq!(results.export.cell(0, BUDGET_AMOUNT_FIELD), Some("150000000"));
        assert_eq!(results.display.detail_link(0), Some("https://www.g2b.go.kr/link?bidno=1"));
    }

    #[tokio::test]
    async fn test_no_keyword_match_names_refinements() {
        let mut transport = MockPageTransport::new();
        transport.expect_get().returning(|_| {
            Ok(RawResponse::ok(envelope(json!([notice(1, "어린이 도서관")]), 1)))
        });

        let outcome = pipeline(transport)
            .run(&request(Category::BidNotice, "어린이 철도"))
            .await;
        let failure = outcome.into_result().unwrap_err();

        assert_eq!(failure.kind, FailureKind::NoKeywordMatch);
        assert_eq!(
            failure.detail,
            "'어린이' 관련 데이터 1개를 가져왔으나,\n상세 조건('철도')이 포함된 공고는 없습니다."
        );
        assert_eq!(failure.status, FAILURE_STATUS);
        assert!(failure.shows_dialog());
    }

    #[tokio::test]
    async fn test_range_exceeded_aborts_run() {
        let mut transport = MockPageTransport::new();
        transport.expect_get().times(1).returning(|_| {
            let body = json!({"nkoneps.com.response.ResponseError": {
                "header": {"resultCode": "07", "resultMsg": "입력범위값 초과 에러"}
            }});
            Ok(RawResponse::ok(body.to_string()))
        });

        let outcome = pipeline(transport).run(&request(Category::PreSpec, "축제")).await;
        assert_eq!(outcome.state(), PipelineState::Failed(FailureKind::RangeExceeded));
        let failure = outcome.into_result().unwrap_err();
        assert_eq!(
            failure.detail,
            "최대 검색기간을 초과하였습니다.\n31일 이내로 검색해주세요."
        );
    }

    #[tokio::test]
    async fn test_empty_search_reports_no_results() {
        let mut transport = MockPageTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(RawResponse::ok(envelope(json!([]), 0))));

        let failure = pipeline(transport)
            .run(&request(Category::BidNotice, "축제"))
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoResults);
        assert!(!failure.shows_dialog());
    }

    #[tokio::test]
    async fn test_empty_items_object_reports_no_results() {
        let mut transport = MockPageTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(RawResponse::ok(envelope(json!({}), 0))));

        let failure = pipeline(transport)
            .run(&request(Category::BidNotice, "축제"))
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoResults);
        assert_eq!(failure.status, FAILURE_STATUS);
    }

    #[tokio::test]
    async fn test_late_parse_failure_discards_partial_results() {
        let mut transport = MockPageTransport::new();
        transport.expect_get().times(2).returning(|url| {
            Ok(match page_no(url) {
                1 => RawResponse::ok(envelope(json!([notice(1, "축제")]), 5)),
                _ => RawResponse::ok("<OpenAPI_ServiceResponse>SERVICE ERROR</OpenAPI_ServiceResponse>"),
            })
        });

        let outcome = pipeline(transport).run(&request(Category::BidNotice, "축제")).await;
        let failure = outcome.into_result().unwrap_err();
        assert_eq!(failure.kind, FailureKind::ParseFailure);
        assert!(failure.detail.starts_with("데이터 파싱 실패: <OpenAPI_ServiceResponse>"));
    }

    #[tokio::test]
    async fn test_unvalidated_request_never_reaches_network() {
        let mut transport = MockPageTransport::new();
        transport.expect_get().times(0);
        let log = Arc::new(StateLog::default());
        let pipeline = pipeline(transport).with_observer(log.clone());

        let reversed = DateRange::new(range().end, range().start);
        let request = SearchRequest {
            category: Category::BidNotice,
            keywords: KeywordSet::default(),
            range: reversed,
            service_key: String::new(),
        };

        let failure = pipeline.run(&request).await.into_result().unwrap_err();
        assert_eq!(failure.kind, FailureKind::InputInvalid);
        assert_eq!(failure.detail, EMPTY_KEYWORD_MESSAGE);
        assert_eq!(
            *log.states.lock(),
            vec![PipelineState::Failed(FailureKind::InputInvalid)]
        );
        assert_eq!(log.pages.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_reports_status() {
        let mut transport = MockPageTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(RawResponse::new(503, "Service Unavailable")));

        let failure = pipeline(transport)
            .run(&request(Category::BidNotice, "축제"))
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::TransportFailure);
        assert_eq!(failure.detail, "서버 접속 오류: 503");
    }

    #[tokio::test]
    async fn test_observer_sees_every_state() {
        let mut transport = MockPageTransport::new();
        transport
            .expect_get()
            .returning(|_| Ok(RawResponse::ok(envelope(json!([notice(1, "축제")]), 1))));
        let log = Arc::new(StateLog::default());

        let outcome = pipeline(transport)
            .with_observer(log.clone())
            .run(&request(Category::BidNotice, "축제"))
            .await;

        assert!(outcome.is_success());
        assert_eq!(
            *log.states.lock(),
            vec![
                PipelineState::Fetching,
                PipelineState::Filtering,
                PipelineState::Projecting,
                PipelineState::Succeeded,
            ]
        );
        assert_eq!(log.pages.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_run_ends_in_failed_state() {
        let mut transport = MockPageTransport::new();
        transport
            .expect_get()
            .returning(|_| Ok(RawResponse::ok(envelope(json!([]), 0))));
        let log = Arc::new(StateLog::default());

        pipeline(transport)
            .with_observer(log.clone())
            .run(&request(Category::BidNotice, "축제"))
            .await;

        assert_eq!(
            *log.states.lock(),
            vec![
                PipelineState::Fetching,
                PipelineState::Failed(FailureKind::NoResults),
            ]
        );
    }

    #[tokio::test]
    async fn test_spawned_run_reports_its_id() {
        let mut transport = MockPageTransport::new();
        transport
            .expect_get()
            .returning(|_| Ok(RawResponse::ok(envelope(json!([notice(1, "축제")]), 1))));
        let pipeline = Arc::new(pipeline(transport));

        let task = pipeline.spawn(request(Category::BidNotice, "축제"));
        let run_id = task.run_id();
        let outcome = task.join().await;

        assert_eq!(outcome.run_id(), run_id);
        assert!(matches!(outcome, SearchOutcome::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_pre_spec_over_http() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let body = json!({"response": {"body": {"items": [{
            "bfSpecRgstNo": "R25BD00012345",
            "prdctClsfcNoNm": "어린이 철도 안전 교육 용역",
            "orderInsttNm": "한국철도공사",
            "asignBdgtAmt": "50000",
            "refNo": "2025-001",
            "specDocFileUrl1": "https://files.example/spec.pdf",
        }], "totalCount": 1}}});

        Mock::given(method("GET"))
            .and(path(
                "/1230000/ao/HrcspSsstndrdInfoService/getPublicPrcureThngInfoServcPPSSrch",
            ))
            .and(query_param("prdctClsfcNoNm", "어린이"))
            .and(query_param("pageNo", "1"))
            .and(query_param("numOfRows", "999"))
            .and(query_param("type", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let config = SearchConfig::default().with_endpoints(EndpointConfig::with_host(&server.uri()));
        let pipeline = SearchPipeline::new(config).unwrap();
        let results = pipeline
            .run(&request(Category::PreSpec, "어린이 안전"))
            .await
            .into_result()
            .unwrap();

        assert_eq!(results.status, "[사전규격] 검색 완료: 1건이 검색되었습니다.");
        let display = results.display.table();
        assert_eq!(display.cell(0, BUDGET_AMOUNT_FIELD), Some("50,000원"));
        assert_eq!(results.display.detail_link(0), None);
        assert_eq!(results.display.attachments(0)[0].label, "규격문서 1");
        assert_eq!(
            results.export.labels(),
            vec!["사전규격등록번호", "참조번호", "품명(사업명)", "발주기관명", "배정예산금액"]
        );
    }

    #[test]
    fn test_run_from_blocking_caller() {
        let mut transport = MockPageTransport::new();
        transport
            .expect_get()
            .returning(|_| Ok(RawResponse::ok(envelope(json!([notice(7, "철도 축제")]), 1))));

        let outcome = tokio_test::block_on(pipeline(transport).run(&request(Category::BidNotice, "철도")));
        assert_eq!(outcome.status(), "[입찰공고] 검색 완료: 1건이 검색되었습니다.");
    }
}
