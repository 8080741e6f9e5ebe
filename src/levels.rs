//! Built-in level plans
//!
//! One character per cell; see `Tile::from_plan_char` and
//! `Actor::from_plan_char` for the legend.

/// Walk right, collect the coins, mind the patroller, reach the exit
pub const MASH_TUN: &str = "
##################################
#................................#
#................................#
#..........o.o.o.................#
#.........#######.......o.o......#
#.....................#######....#
#..@.........m..................E#
##################################
";

/// Conveyors over a lava pit, a grinder to kick, hops to grab
pub const BOIL_KETTLE: &str = "
######################################
#....................................#
#...FWG......................9.......#
#...HJK..........o.o.o...............#
#...TUU[........BBBBBBB.........h....#
#...I..]....>>>>........<<<<...%%%%..#
#.@.L..R...####++++++++++####........#
#...P.QS.1.#................#...n....#
#######################++++###########
";

/// Drips from the ceiling, a bouncing blob, and a hidden ledge
pub const FERMENTER: &str = "
##############################
#??????v??????????v??????????#
#............................#
#.......o.o.............x....#
#......%%%%%....ZZZZ...%%%%..#
#.2......................3..E#
#.@.....=.......|..n.....4...#
##############################
";

/// Built-in campaign, in play order
pub const CAMPAIGN: [&str; 3] = [MASH_TUN, BOIL_KETTLE, FERMENTER];
