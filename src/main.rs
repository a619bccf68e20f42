use serde_json::json;
use stress_test::{stress_test_replication, stress_test_scaling};
use tracing_subscriber::EnvFilter;
use treesync_core::{diff, JsonModel, KeyPath, Model};
use treesync_replica::{Mirror, Publisher, ReplicaConfigBuilder, SyncError};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    demo_session();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async_main());
}

fn sync(publisher: &mut Publisher<serde_json::Value>, mirror: &mut Mirror<serde_json::Value>) -> Result<(), SyncError> {
    let messages = publisher.prepare_sync(&mirror.id)?;
    println!("  -> {}: {} message(s)", mirror.id, messages.len());
    let acked = mirror.apply_all(&messages)?;
    publisher.process_ack(&mirror.id, acked)
}

fn show(label: &str, model: &JsonModel) {
    let json = model.to_json().unwrap_or(serde_json::Value::Null);
    println!("  {:<10} {}", label, json);
}

fn demo_session() {
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          treesync - Diff/Patch Replication Demo            ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let config = ReplicaConfigBuilder::new().max_buffered_deltas(32).build();
    let initial = JsonModel::from(json!({
        "title": "Meeting notes",
        "attendees": ["alice"],
        "status": { "open": true, "priority": 2 }
    }));
    let mut publisher = Publisher::with_state("server", config, initial);
    let mut laptop = Mirror::new("laptop");
    let mut phone = Mirror::new("phone");
    publisher.register_peer("laptop");
    publisher.register_peer("phone");

    println!("\n[1] Initial sync");
    for mirror in [&mut laptop, &mut phone] {
        if let Err(err) = sync(&mut publisher, mirror) {
            println!("  sync failed: {}", err);
        }
    }
    show("server", publisher.state());

    println!("\n[2] Transactions: field update, removal, list append");
    let before = publisher.state().clone();
    publisher.seed(&KeyPath::parse("title"), Model::Primitive(json!("Weekly sync")));
    publisher.seed(&KeyPath::parse("status.priority"), Model::Absent);
    publisher.transact(|state| {
        let path = KeyPath::parse("attendees");
        match state.get_in(&path).and_then(Model::as_list) {
            Some(list) => state.assoc_in(&path, list.add(Model::Primitive(json!("bob"))).into()),
            None => state.clone(),
        }
    });
    println!("  combined diff: {:?}", diff(&before, publisher.state()));

    for mirror in [&mut laptop, &mut phone] {
        if let Err(err) = sync(&mut publisher, mirror) {
            println!("  sync failed: {}", err);
        }
    }
    show("laptop", laptop.state());
    show("phone", phone.state());

    println!("\n[3] Phone edits its copy locally and diverges");
    let local = phone
        .state()
        .assoc_in(&KeyPath::parse("attendees"), JsonModel::from(json!(["carol"])));
    phone.overwrite(local);
    publisher.transact(|state| {
        let path = KeyPath::parse("attendees");
        match state.get_in(&path).and_then(Model::as_list) {
            Some(list) => state.assoc_in(&path, list.add(Model::Primitive(json!("dave"))).into()),
            None => state.clone(),
        }
    });

    match sync(&mut publisher, &mut phone) {
        Err(err) if err.needs_snapshot() => {
            println!("  phone: {}", err);
            if publisher.request_resync("phone").is_ok() {
                println!("\n[4] Resync with snapshot");
                if let Err(err) = sync(&mut publisher, &mut phone) {
                    println!("  resync failed: {}", err);
                }
            }
        }
        Err(err) => println!("  unexpected failure: {}", err),
        Ok(()) => println!("  phone accepted the diff"),
    }
    if let Err(err) = sync(&mut publisher, &mut laptop) {
        println!("  sync failed: {}", err);
    }

    show("server", publisher.state());
    show("laptop", laptop.state());
    show("phone", phone.state());
    println!(
        "\n✓ Mirrors converged: {}",
        laptop.state() == publisher.state() && phone.state() == publisher.state()
    );
}

async fn async_main() {
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            ASYNC STRESS TESTS                               ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // Test 1: small scale
    let stats = stress_test_replication(2, 4, 100, 200).await;
    stats.print();

    // Test 2: medium scale
    let stats = stress_test_replication(4, 10, 500, 1000).await;
    stats.print();

    // Test 3: Scaling analysis
    stress_test_scaling(20, 5).await;

    println!("\n✓ All stress tests completed successfully!");
}
