use agentdesk::agents::{Agent, AnalysisAgent, ResearchAgent};
use agentdesk::planning::{KeywordPlanner, Planner};
use agentdesk::types::Task;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const QUERIES: [&str; 4] = [
    "What is the Adam optimizer?",
    "Analyze the trade-offs of transformer architectures",
    "Do you remember what we said about reinforcement learning?",
    "Find and compare reinforcement learning papers on sample efficiency",
];

fn bench_planner(c: &mut Criterion) {
    let planner = KeywordPlanner::new();
    c.bench_function("planner/keyword_mixed", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(planner.create_plan(black_box(query)).len());
            }
        });
    });
}

fn bench_agents(c: &mut Criterion) {
    let research = ResearchAgent::new();
    let analysis = AnalysisAgent::new();
    let find = Task::FindInformation {
        topic: "reinforcement learning papers".to_string(),
    };

    c.bench_function("agents/research_then_analysis", |b| {
        b.iter(|| {
            tokio_test::block_on(async {
                let found = research.execute_task(black_box(&find)).await;
                let analyzed = analysis
                    .execute_task(&Task::AnalyzeData { data: found.content })
                    .await;
                black_box(analyzed.confidence);
            })
        });
    });
}

criterion_group!(benches, bench_planner, bench_agents);
criterion_main!(benches);
