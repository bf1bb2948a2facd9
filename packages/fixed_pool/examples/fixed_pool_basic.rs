//! Demonstrates recycling game entities through a `FixedPool` with mutation hooks.

use fixed_pool::{Error, FixedPool};

#[derive(Debug, Default)]
struct Projectile {
    position: (i32, i32),
    velocity: (i32, i32),
    active: bool,
}

fn main() -> Result<(), Error> {
    let mut pool = FixedPool::<Projectile>::builder()
        .capacity(3)
        .on_acquired(|projectile| projectile.active = true)
        .on_released(|projectile| *projectile = Projectile::default())
        .build()?;

    let mut fired = Vec::new();

    for lane in 0..5 {
        match pool.acquire() {
            Ok(mut projectile) => {
                let state = pool.get_mut(&mut projectile);
                state.position = (lane, 0);
                state.velocity = (0, 1);
                fired.push(projectile);
            }
            Err(error) => println!("Lane {lane} could not fire: {error}"),
        }
    }

    println!("Projectiles in flight: {}/{}", pool.len(), pool.capacity());

    for projectile in &pool {
        let (x, y) = projectile.position;
        let (dx, dy) = projectile.velocity;
        println!(
            "  at ({x}, {y}) moving ({dx}, {dy}), active: {}",
            projectile.active
        );
    }

    if let Some(first) = fired.first() {
        println!("First projectile: {:?}", pool.get(first));
    }

    for projectile in fired {
        pool.release_owned(projectile)?;
    }

    println!("Projectiles in flight after cleanup: {}", pool.len());

    Ok(())
}
