use criterion::{Criterion, black_box, criterion_group, criterion_main};
use veneer_vfs::{FsNode, VirtualFs, resolve_path};

/// A tree `depth` directories deep with `fanout` files at each level.
fn build_tree(depth: usize, fanout: usize) -> VirtualFs {
    let mut fs = VirtualFs::new();
    let mut parent = "~".to_string();
    for level in 0..depth {
        let name = format!("d{level}");
        fs.mount(&parent, &name, FsNode::dir()).unwrap();
        parent = format!("{parent}/{name}");
        for i in 0..fanout {
            fs.mount(&parent, &format!("f{i}.txt"), FsNode::file("content"))
                .unwrap();
        }
    }
    fs
}

fn bench_lookup(c: &mut Criterion) {
    let fs = build_tree(8, 16);
    c.bench_function("vfs_lookup_deep", |b| {
        b.iter(|| fs.lookup(black_box("~/d0/d1/d2/d3/d4/d5/d6/d7/f15.txt")))
    });
}

fn bench_mount(c: &mut Criterion) {
    let fs = build_tree(8, 16);
    c.bench_function("vfs_mount_deep", |b| {
        b.iter(|| {
            let mut fs = fs.clone();
            fs.mount("~/d0/d1/d2/d3/d4/d5/d6/d7", "new", FsNode::file("x"))
                .unwrap();
            fs
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_path_mixed", |b| {
        b.iter(|| resolve_path(black_box("../x/./y/../z/"), black_box("~/a/b/c")))
    });
}

criterion_group!(benches, bench_lookup, bench_mount, bench_resolve);
criterion_main!(benches);
