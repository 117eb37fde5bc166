use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

fn find_free_port() -> u16 {
    TcpListener::bind(("127.0.0.1", 0))
        .expect("bind probe port")
        .local_addr()
        .expect("local addr")
        .port()
}

fn wait_for_health(client: &Client, port: u16) {
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..60 {
        if let Ok(resp) = client.get(&url).send() {
            if resp.status().is_success() {
                return;
            }
        }
        thread::sleep(Duration::from_millis(100));
    }
    panic!("chat server did not become ready on port {}", port);
}

struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

#[test]
fn serve_answers_chat_requests() {
    let port = find_free_port();
    let bin = assert_cmd::cargo::cargo_bin!("sitepilot");
    let child = Command::new(bin)
        .env("RUST_LOG", "off")
        .args([
            "serve",
            "--bind",
            &format!("127.0.0.1:{port}"),
            "--script",
            "tests/fixtures/script.yaml",
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn serve");
    let _server = KillOnDrop(child);

    let client = Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client");
    wait_for_health(&client, port);

    let response = client
        .post(format!("http://127.0.0.1:{}/api/chat", port))
        .json(&json!({
            "message": "How do I contact Jane?",
            "domContext": "--- SECTION: #contact ---"
        }))
        .send()
        .expect("chat request");
    assert!(response.status().is_success());

    let body: Value = response.json().expect("json body");
    let actions = body["actions"].as_array().expect("actions");
    assert_eq!(actions.len(), 4);
    assert_eq!(actions[0]["name"], "scroll_to_section");
    assert_eq!(actions[2]["name"], "teleport_element");
    assert_eq!(actions[3]["kind"], "response");

    let missing = client
        .post(format!("http://127.0.0.1:{}/api/chat", port))
        .json(&json!({ "domContext": "" }))
        .send()
        .expect("chat request");
    assert_eq!(missing.status().as_u16(), 400);
}
