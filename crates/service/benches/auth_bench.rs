use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use std::time::Duration;

use service::auth::repository::mock::MockUserRepository;
use service::auth::{AuthService, CredentialHasher, TokenManager};

fn bench_login(c: &mut Criterion) {
    let tokens = Arc::new(TokenManager::new(Some("bench-key"), Duration::from_secs(3600)).unwrap());
    let svc = AuthService::new(Arc::new(MockUserRepository::default()), CredentialHasher::new(), tokens);

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.register("bench", "Benchmark1")).unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login("bench", "Benchmark1")).unwrap();
        });
    });
}

fn bench_check_auth(c: &mut Criterion) {
    let tokens = Arc::new(TokenManager::new(Some("bench-key"), Duration::from_secs(3600)).unwrap());
    let header = format!("Bearer {}", tokens.issue("bench-user").unwrap());
    let svc = AuthService::new(Arc::new(MockUserRepository::default()), CredentialHasher::new(), tokens);

    c.bench_function("auth_check_bearer", |b| {
        b.iter(|| svc.check_auth(&header).unwrap());
    });
}

criterion_group!(benches, bench_login, bench_check_auth);
criterion_main!(benches);
