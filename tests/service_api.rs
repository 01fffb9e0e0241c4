use {
    anyhow::Result,
    async_trait::async_trait,
    profit_horizon::{
        AppConfig, AppContext, MarketDataProvider, MarketSpec, PricePoint, SqliteStorage, router,
        utils::epoch_ms_to_naive,
    },
    serde_json::{Value, json},
    std::sync::{Arc, Mutex},
};

const DAY_MS: i64 = 86_400_000;
const START_MS: i64 = 1_704_067_200_000; // 2024-01-01

/// Exchange stand-in: `rows` daily closes climbing one unit per day from 100.
struct LinearExchange {
    rows: i64,
    /// Every market requested, as displayed
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl MarketDataProvider for LinearExchange {
    async fn fetch_candles(
        &self,
        market: &MarketSpec,
        start_time: Option<i64>,
        limit: i32,
    ) -> Result<Vec<PricePoint>> {
        self.seen.lock().unwrap().push(market.to_string());
        let first = match start_time {
            Some(ts) => ((ts - START_MS).max(0) + DAY_MS - 1) / DAY_MS,
            None => (self.rows - i64::from(limit)).max(0),
        };
        Ok((first..self.rows)
            .take(limit as usize)
            .map(|i| PricePoint::new(epoch_ms_to_naive(START_MS + i * DAY_MS).unwrap(), 100.0 + i as f64))
            .collect())
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    base: String,
    client: reqwest::Client,
    exchange: Arc<LinearExchange>,
}

impl Harness {
    async fn start(rows: i64, distinct_status_codes: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("prices.sqlite"),
            model_path: dir.path().join("model.bin"),
            distinct_status_codes,
            ..AppConfig::default()
        };
        let store = SqliteStorage::open(&config.db_path).await.unwrap();
        let exchange = Arc::new(LinearExchange {
            rows,
            seen: Mutex::new(Vec::new()),
        });
        let ctx = AppContext::new(config, Arc::new(store), exchange.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(ctx)).await.unwrap();
        });

        Self {
            _dir: dir,
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            exchange,
        }
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    /// POST without a body; parameters travel in the query string.
    async fn post_query(&self, path_and_query: &str) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path_and_query))
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

#[tokio::test]
async fn fetch_train_predict_round_trip() {
    let h = Harness::start(30, false).await;

    let (status, body) = h.get("/").await;
    assert_eq!(status, 200);
    assert!(body["msg"].is_string());

    let (status, body) = h.post("/fetch-data", json!({ "symbol": "btc/usdt", "limit": 1000 })).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["rows_inserted"], 30);
    assert_eq!(body["rows_new"], 30);

    // Nothing trained yet: generic 500 carrying the message.
    let (status, body) = h.post("/predict-days-profit", json!({ "target_profit": 1.0 })).await;
    assert_eq!(status, 500);
    assert!(body["detail"].as_str().unwrap().contains("train the model first"));

    let (status, body) = h.post("/train-model", json!({})).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["status"], "trained");
    assert_eq!(body["rows_used"], 30);
    assert_eq!(body["last_price"], 129.0);
    assert_eq!(body["last_date"], "2024-01-30 00:00:00");

    let (status, body) = h
        .post("/predict-days-profit", json!({ "targetProfitPercent": 1.0, "maxDays": 365 }))
        .await;
    assert_eq!(status, 200, "{}", body);
    let days = body["days_needed"].as_i64().unwrap();
    assert!((1..=3).contains(&days), "got {}", days);
    assert_eq!(body["last_close"], 129.0);

    let (status, body) = h.post("/predict-days-profit", json!({ "target_profit": 10000.0 })).await;
    assert_eq!(status, 200, "{}", body);
    assert!(body["days_needed"].is_null());
    assert_eq!(body["status"], "Target profit not reached.");
    assert!(body["peak_forecast"]["yhat"].as_f64().unwrap() < body["price_target"].as_f64().unwrap());
}

#[tokio::test]
async fn validate_and_clear() {
    let h = Harness::start(12, false).await;
    h.post("/fetch-data", json!({})).await;

    let (status, body) = h.get("/validate-data?limit=2").await;
    assert_eq!(status, 200);
    assert_eq!(body["row_count"], 12);
    assert_eq!(body["first_rows"][0]["close"], 100.0);
    assert_eq!(body["first_rows"][0]["timestamp"], "2024-01-01 00:00:00");
    assert_eq!(body["last_rows"][1]["close"], 111.0);

    let (status, body) = h.post("/clear-database", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Database cleared.");

    let (_, body) = h.get("/validate-data").await;
    assert_eq!(body["row_count"], 0);

    let (status, body) = h.post("/train-model", json!({})).await;
    assert_eq!(status, 500);
    assert!(body["detail"].as_str().unwrap().contains("insufficient data"));
}

#[tokio::test]
async fn distinct_status_codes_when_enabled() {
    let h = Harness::start(5, true).await;

    let (status, _) = h.post("/predict-days-profit", json!({ "target_profit": 1.0 })).await;
    assert_eq!(status, 404);

    let (status, _) = h.post("/fetch-data", json!({ "timeframe": "7x" })).await;
    assert_eq!(status, 400);

    let (status, body) = h.post("/fetch-data", json!({ "fetch_all": true })).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["rows_inserted"], 5);

    let (status, _) = h.post("/train-model", json!({})).await;
    assert_eq!(status, 422);
}

#[tokio::test]
async fn fetch_without_body_reads_the_query_string() {
    let h = Harness::start(20, false).await;

    let (status, body) = h.post_query("/fetch-data?symbol=ETH/USDT&timeframe=4h&limit=3").await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["rows_inserted"], 3);
    assert_eq!(h.exchange.seen.lock().unwrap().clone(), vec!["ETH/USDT @ 4h".to_string()]);

    // Query parameters are validated like body fields.
    let (status, _) = h.post_query("/fetch-data?timeframe=9y").await;
    assert_eq!(status, 500);
    assert_eq!(h.exchange.seen.lock().unwrap().len(), 1);
}
