//! Ferret 命令行入口
//!
//! 行式 REPL：启动时铸造一个 thread_id，逐行读取查询并打印回答。
//! provider=mock 时全程离线（脚本耗尽后回显），便于无 API Key 试跑。

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ferret::catalog::{CatalogItem, InMemoryCatalog};
use ferret::config::{load_config, AppConfig};
use ferret::engine::{EngineOptions, ShoppingEngine};
use ferret::llm::{
    EmbeddingProvider, HashEmbedder, LlmClient, OpenAiClient, OpenAiEmbedder, ScriptedLlmClient,
};
use ferret::memory::FileThreadStore;

/// 演示用目录数据
fn demo_items() -> Vec<CatalogItem> {
    let raw = [
        (
            "tbl-001",
            "Oak Dining Table",
            "Solid oak dining table with six seats",
            vec!["furniture", "dining"],
        ),
        (
            "sofa-002",
            "Velvet Sofa",
            "Green velvet three-seat sofa",
            vec!["furniture", "living room"],
        ),
        (
            "lamp-003",
            "Brass Desk Lamp",
            "Adjustable brass desk lamp with warm light",
            vec!["lighting"],
        ),
        (
            "chair-004",
            "Walnut Dining Chair",
            "Walnut chair with linen cushion",
            vec!["furniture", "dining"],
        ),
    ];
    raw.into_iter()
        .map(|(id, name, description, categories)| CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            categories: categories.into_iter().map(String::from).collect(),
            embedding: vec![],
            summary: format!("{}. {}", name, description),
        })
        .collect()
}

async fn build_catalog(cfg: &AppConfig) -> anyhow::Result<InMemoryCatalog> {
    let embedder: Arc<dyn EmbeddingProvider> = if cfg.llm.provider == "mock" {
        Arc::new(HashEmbedder::default())
    } else {
        Arc::new(OpenAiEmbedder::new(
            cfg.llm.base_url.as_deref(),
            &cfg.llm.embedding_model,
            None,
        ))
    };
    let mut catalog = InMemoryCatalog::new(embedder);
    for item in demo_items() {
        catalog.index(item).await?;
    }
    Ok(catalog)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = load_config(None).unwrap_or_else(|_| AppConfig::default());

    let llm: Arc<dyn LlmClient> = match cfg.llm.provider.as_str() {
        "mock" => Arc::new(ScriptedLlmClient::new()),
        _ => Arc::new(OpenAiClient::new(
            cfg.llm.base_url.as_deref(),
            &cfg.llm.model,
            None,
        )),
    };
    let catalog = Arc::new(build_catalog(&cfg).await?);
    let store = Arc::new(FileThreadStore::new(&cfg.store.root));

    let engine = ShoppingEngine::new(
        llm,
        catalog,
        store,
        EngineOptions {
            retry: (&cfg.retry).into(),
            max_cycles: cfg.workflow.max_cycles,
            default_n: cfg.tools.lookup.default_n,
            system_prompt: None,
        },
    );

    let thread_id = ShoppingEngine::new_thread_id();
    println!("ferret ready, thread {} (Ctrl-D 退出)", thread_id);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        match engine.run_conversation_turn(query, &thread_id).await {
            Ok(answer) => println!("{}", answer),
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                println!("{}", e.user_message());
            }
        }
    }
    Ok(())
}
