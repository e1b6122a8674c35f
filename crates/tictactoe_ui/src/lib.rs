use bevy::{
    prelude::*,
    log::{Level, LogPlugin},
    window::{PresentMode, WindowResolution},
    tasks::{AsyncComputeTaskPool, Task},
};
use tictactoe_core::{Action, Board, Outcome, Player, BOARD_SIZE};
use tictactoe_engine::TicTacToeAI;

const BACKGROUND: Color = Color::rgb(0.1, 0.1, 0.1);
const CELL_COLOR: Color = Color::rgb(0.9, 0.9, 0.9);
const CELL_HOVER_COLOR: Color = Color::rgb(0.75, 0.75, 0.75);
const X_COLOR: Color = Color::rgb(0.8, 0.2, 0.2);
const O_COLOR: Color = Color::rgb(0.2, 0.3, 0.8);
const BUTTON_COLOR: Color = Color::rgb(0.25, 0.25, 0.25);
const BUTTON_HOVER_COLOR: Color = Color::rgb(0.35, 0.35, 0.35);
const CELL_GAP: f32 = 6.0;

// Everything a player might want to tweak before launching
#[derive(Resource, Debug, Clone)]
pub struct GameSettings {
    pub title: String,
    pub window_size: f32,
    pub cell_size: f32,
    pub ai_delay_secs: f32, // pause before the computer answers
    pub parallel_search: bool,
    pub log_filter: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            title: "Tic-Tac-Toe".into(),
            window_size: 600.0,
            cell_size: 120.0,
            ai_delay_secs: 0.5,
            parallel_search: true,
            log_filter: "wgpu=error,naga=warn,tictactoe_engine=info".into(),
        }
    }
}

pub struct TicTacToeUiPlugin {
    settings: GameSettings,
}

impl TicTacToeUiPlugin {
    pub fn new(settings: GameSettings) -> Self {
        Self { settings }
    }
}

impl Default for TicTacToeUiPlugin {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
enum AppState {
    #[default]
    Menu,
    Playing,
    GameOver,
}

#[derive(Resource)]
struct GameState {
    board: Board,
    human: Player,
    ai: TicTacToeAI,
    ai_thinking_timer: Timer,
    ai_task: Option<Task<Option<Action>>>,
}

impl GameState {
    fn new(settings: &GameSettings) -> Self {
        Self {
            board: Board::new(),
            human: Player::X,
            ai: TicTacToeAI::new(settings.parallel_search),
            ai_thinking_timer: Timer::from_seconds(settings.ai_delay_secs, TimerMode::Once),
            ai_task: None,
        }
    }

    fn is_human_turn(&self) -> bool {
        !self.board.terminal() && self.board.player() == self.human
    }
}

#[derive(Component, Copy, Clone)]
struct CellSquare {
    action: Action,
}

#[derive(Component, Copy, Clone)]
struct Mark {
    action: Action,
}

#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct MenuRoot;

#[derive(Component, Copy, Clone)]
struct ChooseSideButton(Player);

#[derive(Component)]
struct GameOverRoot;

#[derive(Component)]
struct PlayAgainButton;

impl Plugin for TicTacToeUiPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone();

        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: settings.title.clone(),
                        resolution: WindowResolution::new(settings.window_size, settings.window_size),
                        present_mode: PresentMode::AutoVsync,
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: settings.log_filter.clone(),
                    level: Level::INFO,
                    ..default()
                }),
        )
        .insert_resource(ClearColor(BACKGROUND))
        .insert_resource(GameState::new(&settings))
        .insert_resource(settings)
        .add_state::<AppState>()
        .add_systems(Startup, setup)
        .add_systems(OnEnter(AppState::Menu), (reset_game, spawn_menu))
        .add_systems(OnExit(AppState::Menu), despawn_with::<MenuRoot>)
        .add_systems(OnEnter(AppState::GameOver), spawn_game_over)
        .add_systems(OnExit(AppState::GameOver), despawn_with::<GameOverRoot>)
        .add_systems(Update, choose_side.run_if(in_state(AppState::Menu)))
        .add_systems(
            Update,
            (handle_input, update_ai, check_game_over)
                .chain()
                .run_if(in_state(AppState::Playing)),
        )
        .add_systems(Update, play_again.run_if(in_state(AppState::GameOver)))
        .add_systems(Update, (button_hover, highlight_cell, sync_marks, update_status_text));
    }
}

fn setup(mut commands: Commands, settings: Res<GameSettings>) {
    // Camera
    commands.spawn(Camera2dBundle::default());

    let cell_size = settings.cell_size;
    let grid_size = BOARD_SIZE as f32 * cell_size;

    // Grid backdrop; the gaps between cells form the lines
    commands.spawn(SpriteBundle {
        sprite: Sprite {
            color: BACKGROUND,
            custom_size: Some(Vec2::new(grid_size + CELL_GAP, grid_size + CELL_GAP)),
            ..default()
        },
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..default()
    });

    // Cells and their (initially blank) marks
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let action = Action::new(row, col);
            let center = cell_to_world(action, cell_size);

            commands.spawn((
                SpriteBundle {
                    sprite: Sprite {
                        color: CELL_COLOR,
                        custom_size: Some(Vec2::splat(cell_size - CELL_GAP)),
                        ..default()
                    },
                    transform: Transform::from_translation(center.extend(1.0)),
                    ..default()
                },
                CellSquare { action },
            ));

            commands.spawn((
                Text2dBundle {
                    text: Text::from_section(
                        "",
                        TextStyle {
                            font_size: cell_size * 0.7,
                            color: X_COLOR,
                            ..default()
                        },
                    ),
                    transform: Transform::from_translation(center.extend(2.0)),
                    ..default()
                },
                Mark { action },
            ));
        }
    }

    // Status line
    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 30.0,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        }),
        StatusText,
    ));
}

fn reset_game(mut game_state: ResMut<GameState>, settings: Res<GameSettings>) {
    *game_state = GameState::new(&settings);
}

fn spawn_menu(mut commands: Commands) {
    commands
        .spawn((overlay_node(), MenuRoot))
        .with_children(|parent| {
            for player in [Player::X, Player::O] {
                parent
                    .spawn((button_bundle(), ChooseSideButton(player)))
                    .with_children(|button| {
                        button.spawn(button_label(format!("Play as {}", player)));
                    });
            }
        });
}

fn spawn_game_over(mut commands: Commands) {
    commands
        .spawn((overlay_node(), GameOverRoot))
        .with_children(|parent| {
            parent
                .spawn((button_bundle(), PlayAgainButton))
                .with_children(|button| {
                    button.spawn(button_label("Play Again".to_string()));
                });
        });
}

fn overlay_node() -> NodeBundle {
    NodeBundle {
        style: Style {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::FlexEnd,
            column_gap: Val::Px(20.0),
            padding: UiRect::bottom(Val::Px(20.0)),
            ..default()
        },
        ..default()
    }
}

fn button_bundle() -> ButtonBundle {
    ButtonBundle {
        style: Style {
            width: Val::Px(200.0),
            height: Val::Px(50.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        background_color: BUTTON_COLOR.into(),
        ..default()
    }
}

fn button_label(label: String) -> TextBundle {
    TextBundle::from_section(
        label,
        TextStyle {
            font_size: 28.0,
            color: Color::WHITE,
            ..default()
        },
    )
}

fn despawn_with<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn button_hover(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut color) in buttons.iter_mut() {
        *color = match interaction {
            Interaction::Hovered | Interaction::Pressed => BUTTON_HOVER_COLOR.into(),
            Interaction::None => BUTTON_COLOR.into(),
        };
    }
}

fn choose_side(
    buttons: Query<(&Interaction, &ChooseSideButton), Changed<Interaction>>,
    mut game_state: ResMut<GameState>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for (interaction, side) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            info!("human plays {}", side.0);
            game_state.human = side.0;
            next_state.set(AppState::Playing);
        }
    }
}

fn play_again(
    buttons: Query<&Interaction, (Changed<Interaction>, With<PlayAgainButton>)>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for interaction in buttons.iter() {
        if *interaction == Interaction::Pressed {
            next_state.set(AppState::Menu);
        }
    }
}

fn handle_input(
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mouse_button: Res<Input<MouseButton>>,
    settings: Res<GameSettings>,
    mut game_state: ResMut<GameState>,
) {
    if !game_state.is_human_turn() || !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    let Some(world_position) = cursor_world_position(windows.single(), camera_q.single()) else {
        return;
    };

    // Clicks outside the grid are ignored
    let Some(action) = world_to_cell(world_position, settings.cell_size) else {
        return;
    };

    match game_state.board.result(action) {
        Ok(next) => {
            info!("human {} plays {}", game_state.human, action);
            game_state.board = next;
        }
        Err(err) => info!("{}", err),
    }
}

fn update_ai(time: Res<Time>, mut game_state: ResMut<GameState>) {
    if game_state.board.terminal() || game_state.board.player() == game_state.human {
        return;
    }

    game_state.ai_thinking_timer.tick(time.delta());

    if game_state.ai_task.is_none() && game_state.ai_thinking_timer.finished() {
        let board = game_state.board;
        let ai = game_state.ai;
        let thread_pool = AsyncComputeTaskPool::get();

        game_state.ai_task = Some(thread_pool.spawn(async move { ai.get_move(&board) }));
    }

    if let Some(mut task) = game_state.ai_task.take() {
        match futures_lite::future::block_on(futures_lite::future::poll_once(&mut task)) {
            Some(Some(action)) => {
                match game_state.board.result(action) {
                    Ok(next) => game_state.board = next,
                    Err(err) => warn!("computer move rejected: {}", err),
                }
                game_state.ai_thinking_timer.reset();
            }
            Some(None) => game_state.ai_thinking_timer.reset(),
            // Still thinking
            None => game_state.ai_task = Some(task),
        }
    }
}

// Shade the empty cell under the cursor while the human is to move
fn highlight_cell(
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    settings: Res<GameSettings>,
    game_state: Res<GameState>,
    mut cells: Query<(&CellSquare, &mut Sprite)>,
) {
    let hovered = if game_state.is_human_turn() {
        cursor_world_position(windows.single(), camera_q.single())
            .and_then(|position| world_to_cell(position, settings.cell_size))
    } else {
        None
    };

    for (cell, mut sprite) in cells.iter_mut() {
        let is_open = game_state
            .board
            .get(cell.action.row, cell.action.col)
            .is_some_and(|c| c.is_empty());
        let color = if hovered == Some(cell.action) && is_open {
            CELL_HOVER_COLOR
        } else {
            CELL_COLOR
        };
        if sprite.color != color {
            sprite.color = color;
        }
    }
}

fn check_game_over(game_state: Res<GameState>, mut next_state: ResMut<NextState<AppState>>) {
    if game_state.board.terminal() {
        info!("game over: {:?} on {}", game_state.board.outcome(), game_state.board);
        next_state.set(AppState::GameOver);
    }
}

fn sync_marks(game_state: Res<GameState>, mut marks: Query<(&Mark, &mut Text)>) {
    if !game_state.is_changed() {
        return;
    }

    for (mark, mut text) in marks.iter_mut() {
        let owner = game_state
            .board
            .get(mark.action.row, mark.action.col)
            .and_then(|cell| cell.owner());
        let section = &mut text.sections[0];
        match owner {
            Some(player) => {
                section.value = player.to_string();
                section.style.color = player_color(player);
            }
            None => section.value.clear(),
        }
    }
}

fn update_status_text(
    app_state: Res<State<AppState>>,
    game_state: Res<GameState>,
    mut text_query: Query<&mut Text, With<StatusText>>,
) {
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    let status = match app_state.get() {
        AppState::Menu => "Play Tic-Tac-Toe".to_string(),
        AppState::Playing if game_state.is_human_turn() => {
            format!("Play as {}: your turn", game_state.human)
        }
        AppState::Playing => "Computer thinking...".to_string(),
        AppState::GameOver => match game_state.board.outcome() {
            Outcome::Winner(player) => format!("Game Over: {} wins.", player),
            Outcome::Draw | Outcome::InProgress => "Game Over: Tie.".to_string(),
        },
    };

    if text.sections[0].value != status {
        text.sections[0].value = status;
    }
}

fn cursor_world_position(window: &Window, (camera, camera_transform): (&Camera, &GlobalTransform)) -> Option<Vec2> {
    window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor))
        .map(|ray| ray.origin.truncate())
}

fn player_color(player: Player) -> Color {
    match player {
        Player::X => X_COLOR,
        Player::O => O_COLOR,
    }
}

// Centre of a cell in world space; row 0 is the top row
fn cell_to_world(action: Action, cell_size: f32) -> Vec2 {
    let offset = (BOARD_SIZE as f32 - 1.0) / 2.0;
    Vec2::new(
        (action.col as f32 - offset) * cell_size,
        (offset - action.row as f32) * cell_size,
    )
}

fn world_to_cell(position: Vec2, cell_size: f32) -> Option<Action> {
    let half = BOARD_SIZE as f32 * cell_size / 2.0;
    let col = ((position.x + half) / cell_size).floor();
    let row = ((half - position.y) / cell_size).floor();

    if col < 0.0 || row < 0.0 {
        return None;
    }

    let action = Action::new(row as usize, col as usize);
    if action.is_on_board() {
        Some(action)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_centres_map_back_to_cells() {
        let cell_size = 100.0;
        for index in 0..BOARD_SIZE * BOARD_SIZE {
            let action = Action::from_index(index).unwrap();
            let centre = cell_to_world(action, cell_size);
            assert_eq!(world_to_cell(centre, cell_size), Some(action));
        }
    }

    #[test]
    fn top_left_is_row_zero() {
        assert_eq!(world_to_cell(Vec2::new(-140.0, 140.0), 100.0), Some(Action::new(0, 0)));
        assert_eq!(world_to_cell(Vec2::new(140.0, -140.0), 100.0), Some(Action::new(2, 2)));
    }

    #[test]
    fn clicks_outside_grid_are_ignored() {
        assert_eq!(world_to_cell(Vec2::new(-151.0, 0.0), 100.0), None);
        assert_eq!(world_to_cell(Vec2::new(0.0, 151.0), 100.0), None);
        assert_eq!(world_to_cell(Vec2::new(151.0, 0.0), 100.0), None);
        assert_eq!(world_to_cell(Vec2::new(0.0, -151.0), 100.0), None);
    }

    #[test]
    fn human_turn_follows_board() {
        let mut state = GameState::new(&GameSettings::default());
        assert!(state.is_human_turn());
        state.human = Player::O;
        assert!(!state.is_human_turn());
        state.board = state.board.result(Action::new(1, 1)).unwrap();
        assert!(state.is_human_turn());
    }
}
