//! HTTP solver client tests against a one-shot local stub server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use serde_json::{json, Value};

use trip_planner::config::SolverConfig;
use trip_planner::error::SolveError;
use trip_planner::location::Location;
use trip_planner::model::{Job, Vehicle};
use trip_planner::solver::SolverClient;
use trip_planner::traits::RouteSolver;

/// Serves `response` to a single request and hands back the request body.
fn stub_server(response: Value) -> (String, mpsc::Receiver<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("content length");
                }
            }
        }

        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).expect("read body");
        let request: Value = serde_json::from_slice(&body).expect("json body");
        tx.send(request).expect("send request");

        let payload = response.to_string();
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            payload.len(),
            payload
        )
        .expect("write response");
    });

    (base_url, rx)
}

fn client_for(base_url: String) -> SolverClient {
    SolverClient::new(SolverConfig {
        base_url,
        timeout_secs: 5,
    })
    .expect("build client")
}

#[test]
fn posts_problem_and_returns_output() {
    let output = json!({"code": 0, "routes": []});
    let (base_url, requests) = stub_server(output.clone());
    let client = client_for(base_url);

    let jobs = vec![Job::new(1, Location::new(2.4, 48.9)).with_description("Louvre")];
    let vehicles = vec![Vehicle::new(0).with_start(Location::new(2.3, 48.8))];

    let result = client.solve(&jobs, &vehicles).expect("solve");
    assert_eq!(result, output);

    let request = requests.recv().expect("request body");
    assert_eq!(request["vehicles"], json!([{"id": 0, "start": [2.3, 48.8]}]));
    assert_eq!(
        request["jobs"],
        json!([{"id": 1, "location": [2.4, 48.9], "description": "Louvre"}])
    );
    assert_eq!(request["options"]["g"], true);
}

#[test]
fn non_zero_code_is_rejected() {
    let (base_url, _requests) = stub_server(json!({"code": 2, "error": "Invalid profile: car."}));
    let client = client_for(base_url);

    let jobs = vec![Job::new(1, Location::new(2.4, 48.9))];
    let vehicles = vec![Vehicle::new(0).with_start(Location::new(2.3, 48.8))];

    match client.solve(&jobs, &vehicles) {
        Err(SolveError::Rejected { code, message }) => {
            assert_eq!(code, 2);
            assert_eq!(message, "Invalid profile: car.");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn unreachable_solver_is_an_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    drop(listener);

    let client = client_for(base_url);
    let jobs = vec![Job::new(1, Location::new(2.4, 48.9))];
    let vehicles = vec![Vehicle::new(0).with_start(Location::new(2.3, 48.8))];

    assert!(matches!(client.solve(&jobs, &vehicles), Err(SolveError::Http(_))));
}
