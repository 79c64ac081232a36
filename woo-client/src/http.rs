//! WooCommerce REST v3 client

use crate::query::{CategoryQuery, OrderQuery, ProductQuery, page_size};
use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::dto::{CategoryDto, OrderDto, OrderStatusUpdate, ProductDto, ProductUpdate};
use tracing::{debug, instrument};

/// HTTP client for one WooCommerce store
///
/// Authenticates with `consumer_key` / `consumer_secret` query parameters,
/// which works over plain HTTP setups and behind proxies that strip the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub struct WooClient {
    client: Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
}

impl WooClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base(),
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
        })
    }

    /// `{site}/wp-json/wc/v3`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("consumer_key", self.consumer_key.as_str()),
            ("consumer_secret", self.consumer_secret.as_str()),
        ]
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> ClientResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .query(&self.auth())
            .query(params)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self
            .client
            .put(self.url(path))
            .query(&self.auth())
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(ClientError::from_status(status, text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ClientError::InvalidResponse(format!("{} (body starts with {:?})", e, preview(&text)))
        })
    }

    // ========== Orders ==========

    #[instrument(skip(self), fields(page = query.page, status = ?query.status))]
    pub async fn list_orders(&self, query: &OrderQuery) -> ClientResult<Vec<OrderDto>> {
        let orders: Vec<OrderDto> = self.get("orders", &query.to_params()).await?;
        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }

    /// Walk every page of `query`, starting at its page
    pub async fn list_all_orders(&self, query: &OrderQuery) -> ClientResult<Vec<OrderDto>> {
        let mut query = query.clone();
        query.page = query.page.max(1);
        let size = page_size(query.per_page);
        let mut all = Vec::new();
        loop {
            let page = self.list_orders(&query).await?;
            let last = (page.len() as u32) < size;
            all.extend(page);
            if last {
                return Ok(all);
            }
            query.page += 1;
        }
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: u64) -> ClientResult<OrderDto> {
        self.get(&format!("orders/{}", id), &[]).await
    }

    #[instrument(skip(self))]
    pub async fn update_order_status(&self, id: u64, status: &str) -> ClientResult<OrderDto> {
        let body = OrderStatusUpdate {
            status: status.to_string(),
        };
        self.put(&format!("orders/{}", id), &body).await
    }

    // ========== Products ==========

    #[instrument(skip(self), fields(page = query.page))]
    pub async fn list_products(&self, query: &ProductQuery) -> ClientResult<Vec<ProductDto>> {
        self.get("products", &query.to_params()).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: u64) -> ClientResult<ProductDto> {
        self.get(&format!("products/{}", id), &[]).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(&self, id: u64, update: &ProductUpdate) -> ClientResult<ProductDto> {
        if update.is_empty() {
            return Err(ClientError::Validation("Empty product update".to_string()));
        }
        self.put(&format!("products/{}", id), update).await
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self, query: &CategoryQuery) -> ClientResult<Vec<CategoryDto>> {
        self.get("products/categories", &query.to_params()).await
    }

    // ========== Health ==========

    /// Verify the URL and credentials with a one-order fetch
    #[instrument(skip(self), fields(base = %self.base_url))]
    pub async fn test_connection(&self) -> ClientResult<()> {
        let query = OrderQuery::default().per_page(1);
        self.list_orders(&query).await.map(|_| ())
    }
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP server returning `status` with a JSON `body`; yields
    /// the raw request head it received
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let request = read_request(&mut sock).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            sock.write_all(response.as_bytes()).await.unwrap();
            request
        });
        (url, handle)
    }

    /// Read the head plus a `Content-Length` body
    async fn read_request(sock: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serves `pages` in order, one connection each; yields the request heads
    async fn serve_pages(pages: Vec<&'static str>) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut heads = Vec::new();
            for body in pages {
                let (mut sock, _) = listener.accept().await.unwrap();
                let request = read_request(&mut sock).await;
                heads.push(request.lines().next().unwrap_or_default().to_string());
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                sock.write_all(response.as_bytes()).await.unwrap();
            }
            heads
        });
        (url, handle)
    }

    fn client(url: &str) -> WooClient {
        ClientConfig::new(url, "ck_test", "cs_test")
            .with_timeout(5)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_orders_sends_auth_and_filters() {
        let (url, server) = serve_once("200 OK", r#"[{"id":7,"number":"7","status":"processing"}]"#).await;
        let orders = client(&url)
            .list_orders(&OrderQuery::default().status("processing"))
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, 7);

        let request = server.await.unwrap();
        let head = request.lines().next().unwrap();
        assert!(head.starts_with("GET /wp-json/wc/v3/orders?"));
        assert!(head.contains("consumer_key=ck_test"));
        assert!(head.contains("consumer_secret=cs_test"));
        assert!(head.contains("status=processing"));
    }

    #[tokio::test]
    async fn test_list_all_orders_stops_with_zero_page_size() {
        let (url, server) = serve_pages(vec![r#"[{"id":1}]"#, r#"[{"id":2}]"#, "[]"]).await;
        let query = OrderQuery::default().per_page(0).page(0);
        let orders = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            client(&url).list_all_orders(&query),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);

        let heads = server.await.unwrap();
        assert!(heads[0].contains("&page=1&"));
        assert!(heads[1].contains("&page=2&"));
        assert!(heads[2].contains("&page=3&"));
        assert!(heads.iter().all(|h| h.contains("&per_page=1&")));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_error() {
        let (url, _server) = serve_once("401 Unauthorized", r#"{"code":"woocommerce_rest_cannot_view"}"#).await;
        let err = client(&url).get_order(1).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_update_status_puts_json_body() {
        let (url, server) = serve_once("200 OK", r#"{"id":9,"status":"completed"}"#).await;
        let order = client(&url).update_order_status(9, "completed").await.unwrap();
        assert_eq!(order.status, "completed");

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /wp-json/wc/v3/orders/9?"));
        assert!(request.contains(r#"{"status":"completed"}"#));
    }

    #[tokio::test]
    async fn test_html_body_is_invalid_response() {
        let (url, _server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let err = client(&url).get_product(3).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_product_update_is_rejected_locally() {
        let c = client("http://127.0.0.1:9");
        let err = c.update_product(1, &ProductUpdate::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
