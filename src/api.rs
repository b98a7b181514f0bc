use crate::error::Error;
use crate::models::{
    Board, CreateTasksRequest, CreateTasksResponse, GeneratePreviewRequest,
    GeneratePreviewResponse, WorkspaceLabel,
};
use reqwest::{Client, Response};

// Pull a human-readable message out of a failed response, preferring
// the payload's "message" field over the raw body.
async fn error_message(res: Response) -> Error {
    let fallback = format!("request failed with status {}", res.status());
    match res.text().await {
        Ok(body) => {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
                if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
                    return Error::Api(message.to_string());
                }
            }
            if body.trim().is_empty() {
                Error::Api(fallback)
            } else {
                Error::Api(body)
            }
        }
        Err(_) => Error::Api(fallback),
    }
}

pub async fn generate_preview(
    instance_url: &str,
    api_key: &str,
    request: &GeneratePreviewRequest,
) -> Result<GeneratePreviewResponse, Error> {
    let client = Client::new();
    let url = format!("{}/api/v1/journal/preview", instance_url);

    let res = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(request)
        .send()
        .await?;

    if res.status().is_success() {
        Ok(res.json::<GeneratePreviewResponse>().await?)
    } else {
        Err(error_message(res).await)
    }
}

pub async fn create_tasks(
    instance_url: &str,
    api_key: &str,
    request: &CreateTasksRequest,
) -> Result<CreateTasksResponse, Error> {
    let client = Client::new();
    let url = format!("{}/api/v1/journal/tasks", instance_url);

    let res = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(request)
        .send()
        .await?;

    if res.status().is_success() {
        Ok(res.json::<CreateTasksResponse>().await?)
    } else {
        Err(error_message(res).await)
    }
}

pub async fn fetch_workspace_labels(
    instance_url: &str,
    api_key: &str,
) -> Result<Vec<WorkspaceLabel>, Error> {
    let client = Client::new();
    let url = format!("{}/api/v1/labels", instance_url);

    let res = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .send()
        .await?;

    if res.status().is_success() {
        Ok(res.json::<Vec<WorkspaceLabel>>().await?)
    } else {
        Err(error_message(res).await)
    }
}

pub async fn fetch_boards(instance_url: &str, api_key: &str) -> Result<Vec<Board>, Error> {
    let client = Client::new();
    let url = format!("{}/api/v1/boards?includeLists=true", instance_url);

    let res = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .send()
        .await?;

    if res.status().is_success() {
        Ok(res.json::<Vec<Board>>().await?)
    } else {
        Err(error_message(res).await)
    }
}
