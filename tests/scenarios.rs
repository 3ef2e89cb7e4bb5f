use rand::SeedableRng;
use rand::rngs::SmallRng;
use snake_qlearn::config::{Config, GameConfig};
use snake_qlearn::entity::{Food, Obstacles, Snake};
use snake_qlearn::obstacles::is_fully_connected;
use snake_qlearn::{Collision, Direction, Game, Outcome, Pos, Session, experiment, results};

fn board(config: GameConfig, snake: Snake, food: Pos, obstacles: Obstacles) -> Game {
    Game::from_parts(config, snake, Food::new(food), obstacles).unwrap()
}

#[test]
fn eating_grows_the_tail_and_moves_the_food() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut game = board(
        GameConfig::default(),
        Snake::new(Pos::new(0, 0), Direction::Right),
        Pos::new(40, 0),
        Obstacles::default(),
    );

    assert_eq!(game.tick(&mut rng), Outcome::Moved { ate: true });
    assert_eq!(game.snake.head, Pos::new(40, 0));
    assert_eq!(game.score, 1);
    assert_eq!(game.snake.tail, [Pos::new(0, 0)]);
    assert!(!game.snake.occupies(game.food.pos));
    assert!(game.playfield().contains(game.food.pos));
}

#[test]
fn no_boundary_wraps_left_edge_to_right() {
    let mut rng = SmallRng::seed_from_u64(2);
    let config = GameConfig { no_boundary: true, ..GameConfig::default() };
    let mut game = board(config, Snake::new(Pos::new(0, 200), Direction::Left), Pos::new(400, 400), Obstacles::default());

    assert_eq!(game.tick(&mut rng), Outcome::Wrapped { ate: false });
    assert_eq!(game.snake.head, Pos::new(760, 200));
    assert!(game.is_running());
}

#[test]
fn assist_takes_the_only_safe_turn() {
    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = GameConfig { assist: true, ..GameConfig::default() };
        let snake = Snake::with_tail(
            Pos::new(200, 200),
            Direction::Right,
            [Pos::new(240, 160), Pos::new(200, 160), Pos::new(160, 160), Pos::new(160, 200)],
        );
        let mut game = board(config, snake, Pos::new(600, 480), Obstacles::new([Pos::new(240, 200)]));

        // right is the obstacle, up is body, left reverses
        assert_eq!(game.tick(&mut rng), Outcome::Redirected { cause: Collision::Obstacle, ate: false });
        assert_eq!(game.snake.head, Pos::new(200, 240));
        assert_eq!(game.snake.heading, Direction::Down);
    }
}

#[test]
fn same_seed_same_learning() {
    let mut config = Config::default();
    config.learning.tick_limit = 2_000;

    let run = |seed| {
        let mut session = Session::new(config.clone(), seed).unwrap();
        let mut scores = Vec::new();
        for _ in 0..5 {
            scores.push(session.play_episode().score);
            session.reset().unwrap();
        }
        (scores, session.table().snapshot())
    };

    assert_eq!(run(17), run(17));
}

#[test]
fn obstacles_never_cut_off_the_board() {
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = GameConfig { obstacles: 10, ..GameConfig::default() };
        let game = Game::new(config, &mut rng).unwrap();
        assert_eq!(game.obstacles.len(), 10);
        assert!(is_fully_connected(game.playfield(), &game.obstacles, game.snake.head, false));
        assert!(!game.obstacles.contains(game.food.pos));
    }
}

#[test]
fn training_results_round_trip_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training_data.txt");
    let mut config = Config::default();
    config.learning.tick_limit = 500;

    let records = experiment::train(&config, 2, &[1, 2], 3).unwrap();
    assert_eq!(results::append_session(&path, &records).unwrap(), 1);
    assert_eq!(results::append_session(&path, &records[..1]).unwrap(), 2);

    let (session, read) = results::read_session(&path, Some(1)).unwrap();
    assert_eq!(session, 1);
    assert_eq!(read, records);
    assert_eq!(results::read_session(&path, None).unwrap().1.len(), 1);
}
