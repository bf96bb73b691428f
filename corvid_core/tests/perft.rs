use corvid_core::{perft, Board, FEN_STARTPOS};

const FEN_KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const FEN_POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

fn test_perft_fen_nodes(depth: usize, fen: &str, expected: u64) {
    let mut board = Board::from_fen(fen);
    let nodes = perft(&mut board, depth);
    assert_eq!(
        nodes, expected,
        "perft({depth}, \"{fen}\") expected {expected}, got {nodes}"
    );
}

mod startpos_perft {
    use super::*;

    #[test]
    fn startpos_perft_1() {
        test_perft_fen_nodes(1, FEN_STARTPOS, 20);
    }

    #[test]
    fn startpos_perft_2() {
        test_perft_fen_nodes(2, FEN_STARTPOS, 400);
    }

    #[test]
    fn startpos_perft_3() {
        test_perft_fen_nodes(3, FEN_STARTPOS, 8_902);
    }

    #[test]
    fn startpos_perft_4() {
        test_perft_fen_nodes(4, FEN_STARTPOS, 197_281);
    }

    #[test]
    fn startpos_perft_5() {
        test_perft_fen_nodes(5, FEN_STARTPOS, 4_865_609);
    }
}

mod kiwipete_perft {
    use super::*;

    #[test]
    fn kiwipete_perft_1() {
        test_perft_fen_nodes(1, FEN_KIWIPETE, 48);
    }

    #[test]
    fn kiwipete_perft_3() {
        test_perft_fen_nodes(3, FEN_KIWIPETE, 97_862);
    }

    #[test]
    fn kiwipete_perft_4() {
        test_perft_fen_nodes(4, FEN_KIWIPETE, 4_085_603);
    }
}

mod position_3_perft {
    use super::*;

    #[test]
    fn position_3_perft_4() {
        test_perft_fen_nodes(4, FEN_POSITION_3, 43_238);
    }

    #[test]
    fn position_3_perft_5() {
        test_perft_fen_nodes(5, FEN_POSITION_3, 674_624);
    }
}
